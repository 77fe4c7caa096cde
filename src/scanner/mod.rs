//! One scan cycle: search every keyword, keep what hasn't been seen,
//! merge it into the document.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::app::{NewswatchError, Result};
use crate::config::ScanConfig;
use crate::domain::Item;
use crate::fetcher::{Fetcher, RawEntry};
use crate::normalizer::Normalizer;
use crate::store::{ScanClaim, SharedStore};

/// How often a queued scan checks whether another process has finished.
const CLAIM_RETRY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Pause between consecutive keyword searches
    pub keyword_spacing: Duration,
    /// Upper bound for a single keyword search
    pub fetch_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            keyword_spacing: config.keyword_spacing(),
            fetch_timeout: config.fetch_timeout(),
        }
    }
}

pub struct Scanner {
    store: Arc<SharedStore>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    options: ScanOptions,
    in_flight: Mutex<()>,
}

impl Scanner {
    pub fn new(
        store: Arc<SharedStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        options: ScanOptions,
    ) -> Self {
        Self {
            store,
            fetcher,
            normalizer: Normalizer::new(),
            options,
            in_flight: Mutex::new(()),
        }
    }

    /// Run a scan, waiting for any scan already in progress (here or in
    /// another process) to finish first. Returns the number of items added.
    pub async fn run_scan(&self) -> Result<usize> {
        let _running = self.in_flight.lock().await;
        let _claim = self.claim().await?;
        self.scan().await
    }

    /// Run a scan unless one is already in progress, in which case `None`.
    pub async fn try_run_scan(&self) -> Option<Result<usize>> {
        let _running = self.in_flight.try_lock().ok()?;
        let _claim = match self.store.try_claim_scan() {
            Ok(Some(claim)) => claim,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        Some(self.scan().await)
    }

    pub fn is_scanning(&self) -> bool {
        if self.in_flight.try_lock().is_err() {
            return true;
        }
        matches!(self.store.try_claim_scan(), Ok(None))
    }

    async fn claim(&self) -> Result<ScanClaim> {
        let mut waiting = false;
        loop {
            if let Some(claim) = self.store.try_claim_scan()? {
                return Ok(claim);
            }
            if !waiting {
                info!("Another process is scanning, waiting for it to finish");
                waiting = true;
            }
            tokio::time::sleep(CLAIM_RETRY).await;
        }
    }

    async fn scan(&self) -> Result<usize> {
        let started = Instant::now();
        let snapshot = self.store.snapshot()?;
        let seen = snapshot.seen_set();

        let mut fresh: Vec<Item> = Vec::new();
        let mut batch_urls: HashSet<String> = HashSet::new();
        let mut failures = 0usize;

        for (index, keyword) in snapshot.keywords.iter().enumerate() {
            if index > 0 && !self.options.keyword_spacing.is_zero() {
                tokio::time::sleep(self.options.keyword_spacing).await;
            }

            let entries = match self.search(keyword).await {
                Ok(entries) => entries,
                Err(e) => {
                    failures += 1;
                    warn!(keyword = %keyword, error = %e, "keyword search failed");
                    continue;
                }
            };

            let fetched_at = Utc::now();
            let before = fresh.len();
            for raw in entries {
                if let Some(item) = self.normalizer.normalize(keyword, raw, &seen, fetched_at) {
                    // The same link can come back for several keywords; first one wins.
                    if batch_urls.insert(item.url.clone()) {
                        fresh.push(item);
                    }
                }
            }
            debug!(keyword = %keyword, new = fresh.len() - before, "keyword searched");
        }

        // Stable sort: ties keep keyword order, then feed order.
        fresh.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let (added, total) = self.store.mutate(|doc| {
            let added = doc.merge_scan(fresh, Utc::now());
            Ok((added, doc.news.len()))
        })?;

        info!(
            new = added,
            total = total,
            failed_keywords = failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );

        Ok(added)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<RawEntry>> {
        match tokio::time::timeout(self.options.fetch_timeout, self.fetcher.search(keyword)).await
        {
            Ok(result) => result,
            Err(_) => Err(NewswatchError::Timeout(self.options.fetch_timeout)),
        }
    }
}
