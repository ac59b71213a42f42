//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID span, JSON/query decoding, client address)
//!     → public / admin handlers
//!     → response.rs (error envelope, status mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientAddress, JsonBody, Pagination, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
