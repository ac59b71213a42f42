//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Public read / inquiry submission:
//!     → rate_limit.rs (fixed window per endpoint + path + client address)
//!     → handler
//!
//! Admin request:
//!     → auth.rs SessionResolver (bearer token → Option<Session>)
//!     → auth.rs ensure_privileged (401 / 403 / pass)
//!     → handler
//!
//! Every response:
//!     → headers.rs (nosniff, frame denial, referrer policy)
//! ```
//!
//! # Design Decisions
//! - Gate is a pure function of the resolved session
//! - Fail closed: any unknown token is treated as no session
//! - Bucket storage and time source are injected

pub mod auth;
pub mod headers;
pub mod rate_limit;

pub use auth::{ensure_privileged, AuthError, Role, Session, SessionResolver};
pub use rate_limit::{client_address, RateLimitExceeded, RateLimiter};
