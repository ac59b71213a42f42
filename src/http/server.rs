//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with public, admin and health routes
//! - Wire up middleware (tracing, request ID, timeout, body limit, headers)
//! - Apply configuration reloads to the live state
//! - Serve until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::CmsConfig;
use crate::http::request;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::security::auth::{ConfigTokenResolver, SessionResolver};
use crate::security::headers::with_security_headers;
use crate::security::RateLimiter;
use crate::store::ContentStore;
use crate::{admin, public};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live configuration, swapped on reload.
    pub config: Arc<ArcSwap<CmsConfig>>,
    pub store: Arc<ContentStore>,
    pub limiter: Arc<RateLimiter>,
    pub sessions: Arc<dyn SessionResolver>,
    pub started_at: Instant,
}

impl AppState {
    /// State with an in-memory rate limiter and config-backed tokens.
    pub fn new(config: CmsConfig, store: ContentStore) -> Self {
        Self::with_limiter(config, store, RateLimiter::in_memory())
    }

    pub fn with_limiter(config: CmsConfig, store: ContentStore, limiter: RateLimiter) -> Self {
        let config = Arc::new(ArcSwap::from_pointee(config));
        Self {
            sessions: Arc::new(ConfigTokenResolver::new(config.clone())),
            config,
            store: Arc::new(store),
            limiter: Arc::new(limiter),
            started_at: Instant::now(),
        }
    }
}

/// HTTP server for the CMS.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and content.
    pub fn new(config: CmsConfig, store: ContentStore) -> Self {
        Self::with_state(AppState::new(config, store))
    }

    pub fn with_state(state: AppState) -> Self {
        let config = state.config.load_full();
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CmsConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/health", get(health))
            .merge(public::router())
            .merge(admin::router())
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        if config.security.enable_headers {
            with_security_headers(router)
        } else {
            router
        }
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<CmsConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live = self.state.config.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!(
                    tokens = new_config.auth.tokens.len(),
                    rate_limit_enabled = new_config.rate_limit.enabled,
                    "Applying reloaded configuration"
                );
                live.store(Arc::new(new_config));
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    _ = shutdown_signal() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
