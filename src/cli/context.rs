//! Command execution context
//!
//! Loads the configuration, resolves the API URL and builds the services
//! and query client every page needs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStorage, CacheStore, MemoryCache};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{ApiClient, Transport};
use crate::config::{Config, UrlSource};
use crate::error::Result;
use crate::export::{CsvOptions, ExportFormat};
use crate::query::{QueryClient, QueryOptions};
use crate::services::Services;

/// Context for command execution containing config, services and runtime
/// options.
pub struct CommandContext {
    pub config: Config,
    pub services: Services,
    pub query: QueryClient,
    pub format: OutputFormat,
    pub api_url: String,
    pub url_source: UrlSource,
    /// Export requested with `--export`
    pub export: Option<ExportFormat>,
    pub output_dir: PathBuf,
}

impl CommandContext {
    /// Create a context talking to the configured API.
    ///
    /// # Errors
    /// Returns an error if the config cannot be parsed, no API URL can be
    /// resolved in production mode, or the HTTP client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_or_default(opts.config_ref())?;
        let (api_url, url_source) = config.resolve_api_url(opts.api_url_ref(), opts.mode)?;
        log::debug!("Using API at {} ({:?})", api_url, url_source);

        let prefs = &config.preferences;
        let client = ApiClient::new(&api_url, prefs.timeout(), prefs.rate_limit_per_second)?;

        let mut ctx = Self::with_transport(opts, config, Arc::new(client))?;
        ctx.api_url = api_url;
        ctx.url_source = url_source;
        Ok(ctx)
    }

    /// Create a context over any transport
    pub fn with_transport(
        opts: &GlobalOptions,
        config: Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let store: Box<dyn CacheStore> = if opts.persist_cache && !opts.no_cache {
            let mut storage = CacheStorage::open()?;
            match storage.cleanup() {
                Ok(0) => {}
                Ok(n) => log::debug!("Pruned {} expired cache entries", n),
                Err(e) => log::warn!("Cache cleanup failed: {}", e),
            }
            Box::new(storage)
        } else {
            Box::new(MemoryCache::new())
        };
        let query = QueryClient::new(store, !opts.no_cache);
        log::debug!(
            "Response cache {}",
            if query.caching_enabled() { "enabled" } else { "disabled" }
        );

        let output_dir = match &opts.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        Ok(Self {
            config,
            services: Services::new(transport),
            query,
            format: opts.format,
            api_url: String::new(),
            url_source: UrlSource::Override,
            export: opts.export,
            output_dir,
        })
    }

    /// Query options with a feature TTL; the generic default follows the
    /// configured `cache_ttl_secs`.
    pub fn options(&self, ttl: Option<Duration>) -> QueryOptions {
        QueryOptions::default().with_ttl(ttl.unwrap_or_else(|| self.config.preferences.cache_ttl()))
    }

    /// History depth: flag, else config
    pub fn history_months(&self, flag: Option<u32>) -> u32 {
        flag.unwrap_or(self.config.preferences.history_months)
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            separator: self.config.preferences.csv_separator,
            ..Default::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::config::RunMode;
    use tempfile::TempDir;

    pub(crate) fn test_options(dir: &TempDir) -> GlobalOptions {
        GlobalOptions {
            format: OutputFormat::Table,
            api_url: None,
            mode: RunMode::Development,
            config: None,
            no_cache: false,
            persist_cache: false,
            export: None,
            output: Some(dir.path().to_path_buf()),
        }
    }

    pub(crate) fn mock_context(dir: &TempDir, mock: MockTransport) -> CommandContext {
        CommandContext::with_transport(&test_options(dir), Config::default(), Arc::new(mock))
            .unwrap()
    }

    #[test]
    fn test_history_months_flag_wins() {
        let dir = TempDir::new().unwrap();
        let ctx = mock_context(&dir, MockTransport::new());
        assert_eq!(ctx.history_months(Some(3)), 3);
        assert_eq!(ctx.history_months(None), 12);
    }

    #[test]
    fn test_no_cache_disables_query_cache() {
        let dir = TempDir::new().unwrap();
        let opts = GlobalOptions {
            no_cache: true,
            ..test_options(&dir)
        };
        let ctx = CommandContext::with_transport(
            &opts,
            Config::default(),
            Arc::new(MockTransport::new()),
        )
        .unwrap();
        assert!(!ctx.query.caching_enabled());
    }

    #[test]
    fn test_default_ttl_from_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.preferences.cache_ttl_secs = 60;
        let ctx = CommandContext::with_transport(
            &test_options(&dir),
            config,
            Arc::new(MockTransport::new()),
        )
        .unwrap();
        assert_eq!(ctx.options(None).ttl, Duration::from_secs(60));
        assert_eq!(
            ctx.options(Some(Duration::from_secs(5))).ttl,
            Duration::from_secs(5)
        );
    }
}
