//! Public site API.
//!
//! # Responsibilities
//! - Serve published content to anonymous visitors
//! - Accept inquiries from the contact form
//!
//! # Design Decisions
//! - List endpoints and inquiry submission are rate limited; single-item reads are not
//! - Drafts and cancelled departures answer 404, same as missing items

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use self::handlers::*;
use crate::content::{
    BlogPost, Destination, Event, FixedDeparture, Offer, Package, Page, Resource, Testimonial,
};
use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(read_routes::<Destination>())
        .merge(read_routes::<Package>())
        .merge(read_routes::<Event>())
        .merge(read_routes::<FixedDeparture>())
        .merge(read_routes::<Offer>())
        .merge(read_routes::<Testimonial>())
        .merge(read_routes::<BlogPost>())
        .merge(read_routes::<Page>())
        .route("/api/inquiries", post(submit_inquiry))
}

fn read_routes<T: Resource>() -> Router<AppState> {
    Router::new()
        .route(&format!("/api/{}", T::KIND), get(list_published::<T>))
        .route(&format!("/api/{}/{{key}}", T::KIND), get(get_published::<T>))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::{CmsConfig, WindowPolicy};
    use crate::http::{AppState, HttpServer};
    use crate::security::rate_limit::{ManualClock, MemoryBucketStore, RateLimiter};
    use crate::store::ContentStore;

    fn server_at(clock: Arc<ManualClock>) -> HttpServer {
        let mut config = CmsConfig::default();
        config.rate_limit.list = WindowPolicy {
            window_ms: 1_000,
            max_requests: 2,
        };
        let limiter = RateLimiter::new(Arc::new(MemoryBucketStore::new()), clock);
        HttpServer::with_state(AppState::with_limiter(config, ContentStore::in_memory(), limiter))
    }

    fn list_request(address: &str) -> Request<Body> {
        list_request_to("/api/destinations", address)
    }

    fn list_request_to(uri: &str, address: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-forwarded-for", address)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_window_reopens_after_reset() {
        let clock = Arc::new(ManualClock::new(10_000));
        let server = server_at(clock.clone());
        let router = server.router();

        for _ in 0..2 {
            let res = router.clone().oneshot(list_request("203.0.113.9")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
        let res = router.clone().oneshot(list_request("203.0.113.9")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()["retry-after"], "1");

        // another address has its own bucket
        let res = router.clone().oneshot(list_request("198.51.100.4")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        clock.advance(1_000);
        let res = router.clone().oneshot(list_request("203.0.113.9")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(server.state().limiter.tracked_buckets(), 2);
    }

    #[tokio::test]
    async fn test_malformed_query_still_counts() {
        let clock = Arc::new(ManualClock::new(0));
        let router = server_at(clock).router();

        let bad = "/api/destinations?limit=lots";
        let res = router.clone().oneshot(list_request_to(bad, "192.0.2.7")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = router.clone().oneshot(list_request_to(bad, "192.0.2.7")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = router.clone().oneshot(list_request("192.0.2.7")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
