//! Shared utilities for integration testing.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use travel_cms::config::ApiToken;
use travel_cms::security::Role;
use travel_cms::{CmsConfig, ContentStore, HttpServer, Shutdown};

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const USER_TOKEN: &str = "user-secret";

/// Defaults plus one SUPERADMIN and one USER token.
pub fn test_config(addr: SocketAddr) -> CmsConfig {
    let mut config = CmsConfig::default();
    config.listener.bind_address = addr.to_string();
    config.auth.tokens = vec![
        ApiToken {
            token: ADMIN_TOKEN.into(),
            user_id: "admin-1".into(),
            role: Role::Superadmin,
        },
        ApiToken {
            token: USER_TOKEN.into(),
            user_id: "user-1".into(),
            role: Role::User,
        },
    ];
    config
}

/// Start the server with an in-memory store. Returns once it is accepting.
pub async fn start_server(config: CmsConfig) -> Shutdown {
    start_server_with_updates(config).await.0
}

/// Like [`start_server`], also returning the config reload channel.
pub async fn start_server_with_updates(
    config: CmsConfig,
) -> (Shutdown, mpsc::UnboundedSender<CmsConfig>) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let server = HttpServer::new(config, ContentStore::in_memory());
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    (shutdown, updates_tx)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn destination(slug: &str, published: bool) -> Value {
    json!({
        "name": "Nepal",
        "slug": slug,
        "country": "Nepal",
        "summary": "Himalayan treks and temple towns",
        "published": published,
    })
}

#[allow(dead_code)]
pub fn package(slug: &str, destination: &str, published: bool) -> Value {
    json!({
        "title": "Everest Base Camp",
        "slug": slug,
        "destination": destination,
        "duration_days": 14,
        "price": 1450,
        "currency": "USD",
        "itinerary": [
            { "day": 2, "title": "Fly to Lukla" },
            { "day": 1, "title": "Arrive in Kathmandu" }
        ],
        "published": published,
    })
}
