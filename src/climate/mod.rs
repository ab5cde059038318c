//! Climate lookup: location parsing, the Open-Meteo client and a caching wrapper.

pub mod cache;
pub mod location;
pub mod open_meteo;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use location::{Location, LocationError};
pub use open_meteo::OpenMeteoClient;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::ClimateReading;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("no geocoding result for {0:?}")]
    NotFound(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("climate response carried no usable series")]
    EmptySeries,
}

/// Source of climate readings. Lookups never fail: any problem yields the
/// estimated default reading.
#[async_trait]
pub trait ClimateProvider: Send + Sync {
    async fn lookup(&self, location: &str) -> ClimateReading;
}

/// Provider that remembers measured readings per normalized location.
/// Estimated readings are not cached so a later lookup can still succeed.
pub struct CachedClimateProvider {
    inner: Arc<dyn ClimateProvider>,
    cache: TtlCache<String, ClimateReading>,
}

impl CachedClimateProvider {
    pub fn new(inner: Arc<dyn ClimateProvider>, cache: TtlCache<String, ClimateReading>) -> Self {
        Self { inner, cache }
    }

    fn key(location: &str) -> String {
        Location::parse(location)
            .map(|l| l.cache_key())
            .unwrap_or_else(|_| location.trim().to_lowercase())
    }
}

#[async_trait]
impl ClimateProvider for CachedClimateProvider {
    async fn lookup(&self, location: &str) -> ClimateReading {
        let key = Self::key(location);
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "climate cache hit");
            return hit;
        }

        let reading = self.inner.lookup(location).await;
        if !reading.is_estimated() {
            self.cache.insert(key, reading.clone());
        }
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    struct CountingProvider {
        calls: AtomicUsize,
        estimated: bool,
    }

    #[async_trait]
    impl ClimateProvider for CountingProvider {
        async fn lookup(&self, location: &str) -> ClimateReading {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.estimated {
                ClimateReading::estimated(location, None, None)
            } else {
                ClimateReading::measured(location, None, None, 5.0, 4.0, 20.0)
            }
        }
    }

    fn provider(estimated: bool) -> (Arc<CountingProvider>, Arc<ManualClock>, CachedClimateProvider) {
        let inner = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            estimated,
        });
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::new(Duration::from_secs(600), 16, clock.clone());
        let cached = CachedClimateProvider::new(inner.clone(), cache);
        (inner, clock, cached)
    }

    #[tokio::test]
    async fn test_measured_reading_is_cached() {
        let (inner, clock, cached) = provider(false);
        cached.lookup("Salta").await;
        cached.lookup("  salta ").await;
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(601));
        cached.lookup("Salta").await;
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_estimated_reading_is_not_cached() {
        let (inner, _clock, cached) = provider(true);
        cached.lookup("Nowhere").await;
        cached.lookup("Nowhere").await;
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
