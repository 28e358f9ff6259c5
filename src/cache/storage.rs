//! SQLite-based cache storage with file blob support
//!
//! Small payloads are stored inline, larger ones (>10KB) as blob files next
//! to the database.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{CacheStats, CacheStore, ClearStats, Result};
use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

/// Payloads larger than this are stored as external blobs
const INLINE_THRESHOLD: usize = 10 * 1024; // 10KB

/// Persistent cache under the user cache directory
pub struct CacheStorage {
    conn: Connection,
    blobs_dir: PathBuf,
    hits: u64,
    misses: u64,
}

impl CacheStorage {
    /// Open or create the cache at the default location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Cache directory (`~/.cache/cbmx` on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("cbmx"))
    }

    /// Open cache storage at a specific directory
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let blobs_dir = cache_dir.join("blobs");
        std::fs::create_dir_all(&blobs_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create blobs dir: {}", e)))?;

        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path, &blobs_dir)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                cache_key TEXT PRIMARY KEY NOT NULL,
                feature TEXT NOT NULL,
                data TEXT,
                blob_path TEXT,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_expires_at ON cache_entries(expires_at);
            CREATE INDEX IF NOT EXISTS idx_feature ON cache_entries(feature);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn,
            blobs_dir,
            hits: 0,
            misses: 0,
        })
    }

    fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Utc::now().timestamp_millis();

        let result: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT data, blob_path FROM cache_entries
                 WHERE cache_key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match result {
            Some((Some(data), None)) => Ok(Some(data.into_bytes())),
            Some((None, Some(blob_path))) => {
                let full_path = self.blobs_dir.join(&blob_path);
                match std::fs::read(&full_path) {
                    Ok(data) => Ok(Some(data)),
                    Err(e) => {
                        log::warn!("Failed to read blob {}: {}", blob_path, e);
                        let _ = self
                            .conn
                            .execute("DELETE FROM cache_entries WHERE cache_key = ?1", [key]);
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Delete rows matching `condition`, removing their blob files too
    fn remove_where(&self, condition: &str, args: &[&dyn ToSql]) -> Result<usize> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT blob_path FROM cache_entries WHERE blob_path IS NOT NULL AND ({})",
            condition
        ))?;
        let blobs: Vec<String> = stmt
            .query_map(args, |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        for blob in blobs {
            if let Err(e) = std::fs::remove_file(self.blobs_dir.join(&blob)) {
                log::debug!("Failed to remove blob {}: {}", blob, e);
            }
        }

        let deleted = self.conn.execute(
            &format!("DELETE FROM cache_entries WHERE {}", condition),
            args,
        )?;
        Ok(deleted)
    }

    /// Write a blob file, sharded by first 2 chars of key
    fn write_blob(&self, key: &str, data: &[u8]) -> Result<String> {
        let shard = &key[..2.min(key.len())];
        let shard_dir = self.blobs_dir.join(shard);
        std::fs::create_dir_all(&shard_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create shard dir: {}", e)))?;

        let filename = format!("{}.json", key);
        let rel_path = format!("{}/{}", shard, filename);

        std::fs::write(shard_dir.join(&filename), data)
            .map_err(|e| CacheError::Io(format!("Failed to write blob: {}", e)))?;

        Ok(rel_path)
    }

    /// Delete the database and all blobs
    fn nuke(db_path: &Path, blobs_dir: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        if blobs_dir.exists() {
            std::fs::remove_dir_all(blobs_dir)
                .map_err(|e| CacheError::Io(format!("Failed to remove blobs dir: {}", e)))?;
        }
        Ok(())
    }
}

impl CacheStore for CacheStorage {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let found = self.lookup(key)?;
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        Ok(found)
    }

    fn put(&mut self, key: &str, feature: &str, data: &[u8], ttl: Duration) -> Result<()> {
        // Millisecond precision so sub-second TTLs behave like the memory store
        let now = Utc::now().timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires = now.saturating_add(ttl_ms);

        if data.len() <= INLINE_THRESHOLD {
            self.conn.execute(
                "INSERT OR REPLACE INTO cache_entries
                 (cache_key, feature, data, blob_path, created_at, expires_at, size_bytes)
                 VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6)",
                params![
                    key,
                    feature,
                    String::from_utf8_lossy(data).to_string(),
                    now,
                    expires,
                    data.len()
                ],
            )?;
        } else {
            let blob_path = self.write_blob(key, data)?;
            self.conn.execute(
                "INSERT OR REPLACE INTO cache_entries
                 (cache_key, feature, data, blob_path, created_at, expires_at, size_bytes)
                 VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6)",
                params![key, feature, blob_path, now, expires, data.len()],
            )?;
        }
        Ok(())
    }

    fn invalidate(&mut self, key: &str) -> Result<bool> {
        Ok(self.remove_where("cache_key = ?1", &[&key])? > 0)
    }

    fn invalidate_by_pattern(&mut self, pattern: &str) -> Result<usize> {
        let removed = self.remove_where(
            "instr(feature, ?1) > 0 OR instr(cache_key, ?1) > 0",
            &[&pattern],
        )?;
        log::debug!("Invalidated {} entries matching '{}'", removed, pattern);
        Ok(removed)
    }

    fn cleanup(&mut self) -> Result<usize> {
        let now = Utc::now().timestamp_millis();
        self.remove_where("expires_at <= ?1", &[&now])
    }

    fn clear(&mut self) -> Result<ClearStats> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |r| r.get(0))?;

        self.conn.execute("DELETE FROM cache_entries", [])?;

        if self.blobs_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.blobs_dir) {
                log::warn!("Failed to clear blobs directory: {}", e);
            }
            std::fs::create_dir_all(&self.blobs_dir)
                .map_err(|e| CacheError::Io(format!("Failed to recreate blobs dir: {}", e)))?;
        }

        Ok(ClearStats {
            entries_removed: count as usize,
        })
    }

    fn stats(&mut self) -> Result<CacheStats> {
        let now = Utc::now().timestamp_millis();

        let total_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM cache_entries", [], |r| r.get(0))?;

        let valid_entries: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cache_entries WHERE expires_at > ?1",
            [now],
            |r| r.get(0),
        )?;

        let total_size: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM cache_entries",
            [],
            |r| r.get(0),
        )?;

        let (oldest, newest): (Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM cache_entries WHERE expires_at > ?1",
            [now],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        Ok(CacheStats {
            total_entries: total_entries as usize,
            valid_entries: valid_entries as usize,
            expired_entries: (total_entries - valid_entries) as usize,
            total_size_bytes: total_size as usize,
            oldest_entry: oldest.map(|ms| ms / 1000),
            newest_entry: newest.map(|ms| ms / 1000),
            hits: self.hits,
            misses: self.misses,
        })
    }
}
