use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "cms-cli")]
#[command(about = "Management CLI for the travel CMS admin API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token of a SUPERADMIN.
    #[arg(short, long, env = "CMS_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Server version, uptime and content counts
    Status,
    /// List every item of a kind, drafts included
    List {
        /// destinations, packages, events, departures, offers, testimonials, posts or pages
        kind: String,
    },
    /// Show visitor inquiries
    Inquiries,
    /// Delete one item by id
    Delete { kind: String, id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
    );

    let base = cli.url.trim_end_matches('/');
    let request = match cli.command {
        Commands::Status => client.get(format!("{base}/api/admin/status")),
        Commands::List { kind } => client.get(format!("{base}/api/admin/{kind}")),
        Commands::Inquiries => client.get(format!("{base}/api/admin/inquiries")),
        Commands::Delete { kind, id } => client.delete(format!("{base}/api/admin/{kind}/{id}")),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
