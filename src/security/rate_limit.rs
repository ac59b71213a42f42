//! Fixed-window rate limiting for public endpoints.
//!
//! Each bucket is keyed by endpoint family, request path and caller address.
//! A bucket admits `max_requests` within its window and is replaced wholesale
//! once the window has passed. Limits are per process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use dashmap::DashMap;
use thiserror::Error;

use crate::config::WindowPolicy;
use crate::observability::metrics;

/// Address component used when the caller sent no `X-Forwarded-For`.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Counted requests for one key within one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub count: u32,
    /// Absolute time (ms since epoch) at which the window ends.
    pub reset_at_ms: u64,
}

/// Storage for rate-limit buckets.
///
/// The in-memory map is the default; a shared cache can stand in without
/// touching the limiter.
pub trait BucketStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Bucket>;
    fn set(&self, key: String, bucket: Bucket);
    /// Number of tracked keys.
    fn len(&self) -> usize;
}

/// Process-local bucket table.
#[derive(Default)]
pub struct MemoryBucketStore {
    buckets: DashMap<String, Bucket>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BucketStore for MemoryBucketStore {
    fn get(&self, key: &str) -> Option<Bucket> {
        self.buckets.get(key).map(|b| *b.value())
    }

    fn set(&self, key: String, bucket: Bucket) {
        self.buckets.insert(key, bucket);
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }
}

/// Source of the current time in milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Rejection returned when a bucket is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Too many requests, retry in {retry_after_ms} ms")]
pub struct RateLimitExceeded {
    pub retry_after_ms: u64,
}

/// Fixed-window limiter over an injected bucket store.
pub struct RateLimiter {
    store: Arc<dyn BucketStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn BucketStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// In-memory store and wall clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBucketStore::new()), Arc::new(SystemClock))
    }

    /// Count one request against `endpoint + path + address`.
    ///
    /// Read-then-write is not atomic: two racing requests on one key can
    /// both be admitted at the limit edge.
    pub fn check(
        &self,
        endpoint: &str,
        window_ms: u64,
        max_requests: u32,
        address: &str,
        path: &str,
    ) -> Result<(), RateLimitExceeded> {
        if max_requests == 0 {
            return Err(self.reject(endpoint, path, address, window_ms));
        }
        let key = bucket_key(endpoint, path, address);
        let now = self.clock.now_ms();

        match self.store.get(&key) {
            Some(bucket) if now < bucket.reset_at_ms => {
                if bucket.count < max_requests {
                    self.store.set(
                        key,
                        Bucket {
                            count: bucket.count + 1,
                            reset_at_ms: bucket.reset_at_ms,
                        },
                    );
                    Ok(())
                } else {
                    Err(self.reject(endpoint, path, address, bucket.reset_at_ms - now))
                }
            }
            _ => {
                self.store.set(
                    key,
                    Bucket {
                        count: 1,
                        reset_at_ms: now.saturating_add(window_ms),
                    },
                );
                Ok(())
            }
        }
    }

    /// [`check`](Self::check) with a configured policy.
    pub fn check_policy(
        &self,
        endpoint: &str,
        policy: &WindowPolicy,
        address: &str,
        path: &str,
    ) -> Result<(), RateLimitExceeded> {
        self.check(endpoint, policy.window_ms, policy.max_requests, address, path)
    }

    fn reject(&self, endpoint: &str, path: &str, address: &str, retry_after_ms: u64) -> RateLimitExceeded {
        tracing::warn!(
            endpoint = %endpoint,
            path = %path,
            client = %address,
            "Rate limit exceeded"
        );
        metrics::record_rate_limited(endpoint);
        RateLimitExceeded { retry_after_ms }
    }

    pub fn tracked_buckets(&self) -> usize {
        self.store.len()
    }
}

fn bucket_key(endpoint: &str, path: &str, address: &str) -> String {
    format!("{endpoint}:{path}:{address}")
}

/// First `X-Forwarded-For` entry, or [`UNKNOWN_ADDRESS`].
pub fn client_address(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_ADDRESS)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limiter_at(start_ms: u64) -> (RateLimiter, Arc<ManualClock>, Arc<MemoryBucketStore>) {
        let clock = Arc::new(ManualClock::new(start_ms));
        let store = Arc::new(MemoryBucketStore::new());
        let limiter = RateLimiter::new(store.clone(), clock.clone());
        (limiter, clock, store)
    }

    #[test]
    fn test_admits_exactly_max_per_window() {
        let (limiter, _clock, _) = limiter_at(0);
        for _ in 0..5 {
            assert!(limiter.check("packages", 60_000, 5, "10.0.0.1", "/api/packages").is_ok());
        }
        for _ in 0..3 {
            assert!(limiter.check("packages", 60_000, 5, "10.0.0.1", "/api/packages").is_err());
        }
    }

    #[test]
    fn test_zero_limit_rejects_first_request() {
        let (limiter, _clock, store) = limiter_at(0);
        let err = limiter.check("x", 1_000, 0, "a", "/p").unwrap_err();
        assert_eq!(err.retry_after_ms, 1_000);
        assert!(store.get("x:/p:a").is_none());
        assert_eq!(limiter.tracked_buckets(), 0);
    }

    #[test]
    fn test_window_elapsed_resets_count() {
        let (limiter, clock, store) = limiter_at(1_000);
        limiter.check("posts", 500, 1, "a", "/api/posts").unwrap();
        assert!(limiter.check("posts", 500, 1, "a", "/api/posts").is_err());

        clock.set(1_500);
        limiter.check("posts", 500, 1, "a", "/api/posts").unwrap();
        let bucket = store.get("posts:/api/posts:a").unwrap();
        assert_eq!(bucket, Bucket { count: 1, reset_at_ms: 2_000 });
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let (limiter, _clock, store) = limiter_at(0);
        limiter.check("pages", 1000, 1, "1.1.1.1", "/api/pages").unwrap();
        assert!(limiter.check("pages", 1000, 1, "1.1.1.1", "/api/pages").is_err());

        // Different address, different path.
        assert!(limiter.check("pages", 1000, 1, "2.2.2.2", "/api/pages").is_ok());
        assert!(limiter.check("pages", 1000, 1, "1.1.1.1", "/api/pages/about").is_ok());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_limit_two_timeline() {
        let (limiter, clock, _) = limiter_at(0);
        assert!(limiter.check("offers", 1000, 2, "x", "/api/offers").is_ok());
        clock.set(100);
        assert!(limiter.check("offers", 1000, 2, "x", "/api/offers").is_ok());
        clock.set(200);
        assert_eq!(
            limiter.check("offers", 1000, 2, "x", "/api/offers"),
            Err(RateLimitExceeded { retry_after_ms: 800 })
        );
        clock.set(1001);
        assert!(limiter.check("offers", 1000, 2, "x", "/api/offers").is_ok());
    }

    #[test]
    fn test_boundary_burst_admits_twice_max() {
        let (limiter, clock, _) = limiter_at(0);
        clock.set(999);
        assert!(limiter.check("events", 1000, 2, "x", "/api/events").is_ok());
        assert!(limiter.check("events", 1000, 2, "x", "/api/events").is_ok());
        clock.advance(1000);
        assert!(limiter.check("events", 1000, 2, "x", "/api/events").is_ok());
        assert!(limiter.check("events", 1000, 2, "x", "/api/events").is_ok());
    }

    #[test]
    fn test_missing_forwarded_for_is_unknown() {
        let headers = HeaderMap::new();
        assert_eq!(client_address(&headers), UNKNOWN_ADDRESS);

        let (limiter, _clock, _) = limiter_at(0);
        let first = client_address(&headers);
        let second = client_address(&HeaderMap::new());
        limiter.check("destinations", 1000, 1, &first, "/api/destinations").unwrap();
        assert!(limiter.check("destinations", 1000, 1, &second, "/api/destinations").is_err());
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.2"));
        assert_eq!(client_address(&headers), "203.0.113.7");

        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_address(&headers), UNKNOWN_ADDRESS);
    }
}
