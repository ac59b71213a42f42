//! Travel agency CMS backend library

pub mod admin;
pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod public;
pub mod security;
pub mod store;

pub use config::schema::CmsConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::ContentStore;
