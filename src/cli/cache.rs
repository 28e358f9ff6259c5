//! Cache management commands

use serde_json::{Value, json};

use crate::cache::{CacheStats, CacheStorage, CacheStore};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::formatters::{format_size, format_timestamp};

fn cache_path() -> String {
    CacheStorage::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn status_json(stats: &CacheStats, path: &str) -> Value {
    json!({
        "total_entries": stats.total_entries,
        "valid_entries": stats.valid_entries,
        "expired_entries": stats.expired_entries,
        "total_size_bytes": stats.total_size_bytes,
        "total_size_human": format_size(stats.total_size_bytes),
        "oldest_entry_timestamp": stats.oldest_entry,
        "newest_entry_timestamp": stats.newest_entry,
        "path": path,
    })
}

/// Show cache status/statistics
pub fn status(format: OutputFormat) -> Result<()> {
    let mut cache = CacheStorage::open()?;
    let stats = cache.stats()?;
    let path = cache_path();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status_json(&stats, &path))?);
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", path);
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_timestamp(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_timestamp(newest));
            }
            if stats.valid_entries == 0 {
                println!();
                println!("Responses are kept on disk only with --persist-cache.");
            }
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(format: OutputFormat) -> Result<()> {
    let mut cache = CacheStorage::open()?;
    let stats = cache.clear()?;

    match format {
        OutputFormat::Json => {
            let json = json!({
                "entries_removed": stats.entries_removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            if stats.entries_removed > 0 {
                println!("Cleared {} cache entries", stats.entries_removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path() -> Result<()> {
    let path = CacheStorage::cache_dir()?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_status_json_fields() {
        let dir = TempDir::new().unwrap();
        let mut cache = CacheStorage::open_at(dir.path()).unwrap();
        cache
            .put("sales:cod_pro=1", "sales", b"{}", Duration::from_secs(60))
            .unwrap();

        let stats = cache.stats().unwrap();
        let json = status_json(&stats, "/tmp/cbmx");
        assert_eq!(json["valid_entries"], 1);
        assert_eq!(json["path"], "/tmp/cbmx");
        assert!(json["total_size_human"].as_str().unwrap().ends_with("bytes"));
    }
}
