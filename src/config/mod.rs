//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CmsConfig (validated, immutable)
//!     → shared via ArcSwap to handlers
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<CmsConfig>
//!     → next request sees new tokens and rate-limit policies
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Listener address, timeouts and body limits are read once at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    ApiToken, AuthConfig, CmsConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig,
    SecurityConfig, StorageConfig, TimeoutConfig, WindowPolicy,
};
