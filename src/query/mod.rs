//! Cached data fetching
//!
//! [`QueryClient::fetch`] composes a service call with the active filters,
//! serves fresh cached payloads without touching the network, and drops
//! responses that were overtaken by a newer fetch of the same feature.

mod feature;
mod state;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub use feature::FeatureQuery;
pub use state::QueryState;

use crate::cache::{CacheStats, CacheStore, CacheTtl, cache_key};
use crate::client::models::ProductFilters;
use crate::error::{CacheError, Result};

/// Per-call fetch options
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Use the cache for this call
    pub enabled: bool,
    pub ttl: Duration,
    /// Extra values folded into the cache key, e.g. `last_n_months`
    pub params: Vec<(String, String)>,
    /// Skip the request entirely when no filter is active
    pub require_filters: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: CacheTtl::DEFAULT,
            params: Vec::new(),
            require_filters: true,
        }
    }
}

impl QueryOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Fetch even without active filters (lists, suggestions)
    pub fn without_filters(mut self) -> Self {
        self.require_filters = false;
        self
    }
}

#[derive(Default)]
struct Generations {
    issued: u64,
    completed: u64,
}

/// Last decoded payload per key, so repeated cache hits share one `Arc`
struct Decoded {
    bytes: Vec<u8>,
    value: Arc<dyn Any + Send + Sync>,
}

/// Fetches through a shared cache
pub struct QueryClient {
    cache: Mutex<Box<dyn CacheStore>>,
    caching: bool,
    generations: Mutex<HashMap<String, Generations>>,
    decoded: Mutex<HashMap<String, Decoded>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::result::Result<MutexGuard<'_, T>, CacheError> {
    mutex.lock().map_err(|_| CacheError::Poisoned)
}

impl QueryClient {
    /// Client backed by `store`; `caching = false` bypasses it entirely
    pub fn new(store: Box<dyn CacheStore>, caching: bool) -> Self {
        Self {
            cache: Mutex::new(store),
            caching,
            generations: Mutex::new(HashMap::new()),
            decoded: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(crate::cache::MemoryCache::new()), true)
    }

    pub fn caching_enabled(&self) -> bool {
        self.caching
    }

    /// Cache key for a feature, its filters and extra params
    pub fn key_for(feature: &str, filters: &ProductFilters, options: &QueryOptions) -> String {
        let mut params = filters.cache_params();
        params.extend(options.params.iter().cloned());
        cache_key(feature, &params)
    }

    /// Run `fetcher` unless a fresh cached payload exists.
    ///
    /// Never panics and never retries; failures come back as an error state.
    pub async fn fetch<T, F, Fut>(
        &self,
        feature: &str,
        filters: &ProductFilters,
        options: QueryOptions,
        fetcher: F,
    ) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Idle and cached answers take a generation too, so an older
        // request still in flight cannot overwrite them.
        let generation = self.begin(feature);

        let active = filters.has_active_filters();
        if options.require_filters && !active {
            log::debug!("{}: no active filters, not fetching", feature);
            self.complete(feature, generation);
            return QueryState::idle(false);
        }

        let use_cache = self.caching && options.enabled;
        let key = Self::key_for(feature, filters, &options);

        if use_cache {
            if let Some(data) = self.cached::<T>(&key) {
                log::debug!("Cache hit: {}", feature);
                self.complete(feature, generation);
                let mut state = QueryState::success(data, true);
                state.has_active_filters = active;
                return state;
            }
            log::debug!("Cache miss: {}", feature);
        }

        let result = fetcher().await;

        if !self.complete(feature, generation) {
            log::debug!(
                "{}: dropping stale response (generation {})",
                feature,
                generation
            );
            return QueryState::stale();
        }

        let mut state = match result {
            Ok(data) => {
                if use_cache {
                    self.store(&key, feature, &data, options.ttl);
                }
                QueryState::success(Arc::new(data), false)
            }
            Err(err) => {
                log::debug!("{}: fetch failed: {}", feature, err);
                QueryState::failure(err)
            }
        };
        state.has_active_filters = active;
        state
    }

    /// Invalidate the entry for these filters, then fetch.
    pub async fn refetch<T, F, Fut>(
        &self,
        feature: &str,
        filters: &ProductFilters,
        options: QueryOptions,
        fetcher: F,
    ) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = Self::key_for(feature, filters, &options);
        self.invalidate_key(&key);
        self.fetch(feature, filters, options, fetcher).await
    }

    /// Drop every cached entry for features matching `pattern`
    pub fn invalidate(&self, pattern: &str) -> Result<usize> {
        if let Ok(mut decoded) = lock(&self.decoded) {
            decoded.clear();
        }
        Ok(lock(&self.cache)?.invalidate_by_pattern(pattern)?)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        Ok(lock(&self.cache)?.stats()?)
    }

    fn invalidate_key(&self, key: &str) {
        if let Ok(mut decoded) = lock(&self.decoded) {
            decoded.remove(key);
        }
        match lock(&self.cache).and_then(|mut c| c.invalidate(key)) {
            Ok(_) => {}
            Err(e) => log::warn!("Cache invalidation failed: {}", e),
        }
    }

    fn cached<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let bytes = match lock(&self.cache).and_then(|mut c| c.get(key)) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Cache read failed: {}", e);
                return None;
            }
        };

        let mut decoded = lock(&self.decoded).ok()?;
        if let Some(previous) = decoded.get(key) {
            if previous.bytes == bytes {
                if let Ok(value) = previous.value.clone().downcast::<T>() {
                    return Some(value);
                }
            }
        }

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                let value = Arc::new(value);
                decoded.insert(
                    key.to_string(),
                    Decoded {
                        bytes,
                        value: value.clone(),
                    },
                );
                Some(value)
            }
            Err(e) => {
                log::debug!("Discarding undecodable cache entry: {}", e);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, feature: &str, data: &T, ttl: Duration) {
        let bytes = match serde_json::to_vec(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to serialize {} for cache: {}", feature, e);
                return;
            }
        };
        if let Err(e) = lock(&self.cache).and_then(|mut c| c.put(key, feature, &bytes, ttl)) {
            log::warn!("Cache write failed: {}", e);
        }
    }

    fn begin(&self, feature: &str) -> u64 {
        match lock(&self.generations) {
            Ok(mut generations) => {
                let entry = generations.entry(feature.to_string()).or_default();
                entry.issued += 1;
                entry.issued
            }
            Err(_) => 0,
        }
    }

    /// Record a finished fetch; false if a newer one already completed
    fn complete(&self, feature: &str, generation: u64) -> bool {
        match lock(&self.generations) {
            Ok(mut generations) => {
                let entry = generations.entry(feature.to_string()).or_default();
                if generation < entry.completed {
                    false
                } else {
                    entry.completed = generation;
                    true
                }
            }
            Err(_) => true,
        }
    }
}
