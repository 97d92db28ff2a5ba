//! Per-endpoint TTL cache of successful GET responses.
//!
//! Keys are full request URLs. Expired entries are evicted lazily, on the
//! read that finds them stale.

use crate::client::ApiResponse;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::trace;
use reqwest::Method;
use tokio::time::Instant;

/// URL fragments whose GET responses may be cached.
pub const CACHEABLE_FRAGMENTS: [&str; 3] = ["/models", "/health", "/spreads"];

/// TTL classes, matched in order against the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub models: Duration,
    pub health: Duration,
    pub spreads: Duration,
    pub books: Duration,
    pub charts: Duration,
    pub readings: Duration,
    pub default: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            models: Duration::from_secs(30 * 60),
            health: Duration::from_secs(60),
            spreads: Duration::from_secs(60 * 60),
            books: Duration::from_secs(15 * 60),
            charts: Duration::from_secs(10 * 60),
            readings: Duration::ZERO,
            default: Duration::from_secs(5 * 60),
        }
    }
}

impl CachePolicy {
    pub fn ttl_for(&self, url: &str) -> Duration {
        if url.contains("/models") {
            self.models
        } else if url.contains("/health") {
            self.health
        } else if url.contains("/spreads") {
            self.spreads
        } else if url.contains("/reading") {
            self.readings
        } else if url.contains("/books") {
            self.books
        } else if url.contains("/birth_chart") || url.contains("/chart") {
            self.charts
        } else {
            self.default
        }
    }
}

/// GET requests to an allow-listed URL.
pub fn is_cache_eligible(method: &Method, url: &str) -> bool {
    *method == Method::GET && CACHEABLE_FRAGMENTS.iter().any(|f| url.contains(f))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: ApiResponse,
    inserted_at: Instant,
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    policy: CachePolicy,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `url`. A stale entry is removed and reported as a miss.
    pub fn get(&self, url: &str) -> Option<ApiResponse> {
        let ttl = self.policy.ttl_for(url);
        let mut entries = self.entries();

        let fresh = match entries.get(url) {
            None => return None,
            Some(entry) => entry.inserted_at.elapsed() < ttl,
        };

        if fresh {
            trace!("Cache hit: {url}");
            entries.get(url).map(|entry| entry.value.clone())
        } else {
            trace!("Cache expired: {url}");
            entries.remove(url);
            None
        }
    }

    /// Store `value` under `url`, replacing any previous entry. No-op when
    /// the URL's TTL is zero.
    pub fn put(&self, url: &str, value: ApiResponse) {
        if self.policy.ttl_for(url).is_zero() {
            return;
        }

        self.entries().insert(
            url.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
