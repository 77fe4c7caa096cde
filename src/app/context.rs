use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::{NewswatchError, Result};
use crate::config::Config;
use crate::fetcher::{Fetcher, GoogleNewsFetcher};
use crate::scanner::{ScanOptions, Scanner};
use crate::service::NewsService;
use crate::store::{JsonStore, SharedStore};

pub struct AppContext {
    pub data_path: PathBuf,
    pub store: Arc<SharedStore>,
    pub scanner: Arc<Scanner>,
    pub service: NewsService,
}

impl AppContext {
    /// Wire everything from `config`. `data_file` overrides the configured path.
    pub fn new(config: &Config, data_file: Option<PathBuf>) -> Result<Self> {
        let data_path = match data_file {
            Some(p) => p,
            None => config
                .data_file()
                .map_err(|e| NewswatchError::Config(e.to_string()))?,
        };

        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(GoogleNewsFetcher::new(&config.feed, &config.scan)?);

        Self::with_fetcher(&data_path, fetcher, ScanOptions::from(&config.scan))
    }

    pub fn with_fetcher(
        data_path: &Path,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        options: ScanOptions,
    ) -> Result<Self> {
        let json = JsonStore::new(data_path);
        json.ensure_exists()?;

        let store = Arc::new(SharedStore::new(Arc::new(json)));
        let scanner = Arc::new(Scanner::new(store.clone(), fetcher, options));
        let service = NewsService::new(store.clone(), scanner.clone());

        Ok(Self {
            data_path: data_path.to_path_buf(),
            store,
            scanner,
            service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_KEYWORDS;
    use crate::fetcher::stub::StubFetcher;

    #[test]
    fn test_first_run_writes_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let ctx = AppContext::with_fetcher(
            &path,
            Arc::new(StubFetcher::new()),
            ScanOptions::default(),
        )
        .unwrap();

        assert!(path.exists());
        let status = ctx.service.status().unwrap();
        assert_eq!(status.keyword_count, DEFAULT_KEYWORDS.len());
        assert_eq!(status.total_news, 0);
        assert!(status.auto_scan);
        assert_eq!(status.interval_minutes, 5);
    }

    #[test]
    fn test_explicit_data_file_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elsewhere.json");

        let ctx = AppContext::new(&Config::default(), Some(path.clone())).unwrap();
        assert_eq!(ctx.data_path, path);
        assert!(path.exists());
    }
}
