//! In-memory TTL cache

use chrono::Utc;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::{CacheStats, CacheStore, ClearStats, Result};

struct Entry {
    feature: String,
    data: Vec<u8>,
    created_at: i64,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_valid_at(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Session-lifetime cache keyed by [`super::cache_key`]
#[derive(Default)]
pub struct MemoryCache {
    entries: HashMap<String, Entry>,
    hits: u64,
    misses: u64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid_at(now) => {
                self.hits += 1;
                Some(entry.data.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_at(key, Instant::now()))
    }

    fn put(&mut self, key: &str, feature: &str, data: &[u8], ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                feature: feature.to_string(),
                data: data.to_vec(),
                created_at: Utc::now().timestamp(),
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    fn invalidate(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn invalidate_by_pattern(&mut self, pattern: &str) -> Result<usize> {
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| !(key.contains(pattern) || entry.feature.contains(pattern)));
        let removed = before - self.entries.len();
        log::debug!("Invalidated {} entries matching '{}'", removed, pattern);
        Ok(removed)
    }

    fn cleanup(&mut self) -> Result<usize> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_valid_at(now));
        Ok(before - self.entries.len())
    }

    fn clear(&mut self) -> Result<ClearStats> {
        let entries_removed = self.entries.len();
        self.entries.clear();
        Ok(ClearStats { entries_removed })
    }

    fn stats(&mut self) -> Result<CacheStats> {
        let now = Instant::now();
        let valid: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| e.is_valid_at(now))
            .collect();

        Ok(CacheStats {
            total_entries: self.entries.len(),
            valid_entries: valid.len(),
            expired_entries: self.entries.len() - valid.len(),
            total_size_bytes: self.entries.values().map(|e| e.data.len()).sum(),
            oldest_entry: valid.iter().map(|e| e.created_at).min(),
            newest_entry: valid.iter().map(|e| e.created_at).max(),
            hits: self.hits,
            misses: self.misses,
        })
    }
}
