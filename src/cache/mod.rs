//! Response cache
//!
//! Fetched payloads are cached per feature and filter set. The in-memory
//! store lives for one session; the SQLite store survives across runs and
//! is opt-in with `--persist-cache`.

pub mod key;
pub mod memory;
pub mod storage;

use std::time::Duration;

use crate::error::CacheError;

pub use key::cache_key;
pub use memory::MemoryCache;
pub use storage::CacheStorage;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache lifetime per feature
pub struct CacheTtl;

impl CacheTtl {
    /// Default lifetime for any fetched payload
    pub const DEFAULT: Duration = Duration::from_secs(5 * 60); // 5 min

    // Reference data changes rarely
    pub const PRODUCT_DETAILS: Duration = Duration::from_secs(30 * 60); // 30 min
    pub const SUGGESTIONS: Duration = Duration::from_secs(10 * 60); // 10 min
    pub const MATRIX: Duration = Duration::from_secs(15 * 60); // 15 min

    // Figures move during the day
    pub const SALES: Duration = Duration::from_secs(5 * 60); // 5 min
    pub const STOCK: Duration = Duration::from_secs(2 * 60); // 2 min
    pub const OPTIMIZATION: Duration = Duration::from_secs(10 * 60); // 10 min
}

/// Storage backend for cached payloads
pub trait CacheStore: Send {
    /// Payload for `key` if present and not expired
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a payload under `key`, tagged with the feature that produced it
    fn put(&mut self, key: &str, feature: &str, data: &[u8], ttl: Duration) -> Result<()>;

    /// Drop one entry; true if it existed
    fn invalidate(&mut self, key: &str) -> Result<bool>;

    /// Drop every entry whose feature or key contains `pattern`
    fn invalidate_by_pattern(&mut self, pattern: &str) -> Result<usize>;

    /// Drop expired entries
    fn cleanup(&mut self) -> Result<usize>;

    fn clear(&mut self) -> Result<ClearStats>;

    fn stats(&mut self) -> Result<CacheStats>;
}

/// Result of a clear operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Snapshot of cache state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: usize,
    /// Unix timestamp of the oldest valid entry
    pub oldest_entry: Option<i64>,
    /// Unix timestamp of the newest valid entry
    pub newest_entry: Option<i64>,
    /// Lookups served from the cache this session
    pub hits: u64,
    /// Lookups that found nothing usable this session
    pub misses: u64,
}

impl CacheStats {
    /// Share of lookups served from cache, 0-100
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}
