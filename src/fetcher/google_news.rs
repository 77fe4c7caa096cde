use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::config::{FeedConfig, ScanConfig};
use crate::fetcher::{Fetcher, RawEntry};
use crate::normalizer::Normalizer;

/// Searches the Google News RSS endpoint.
pub struct GoogleNewsFetcher {
    client: Client,
    endpoint: Url,
    language: String,
    region: String,
    max_entries: usize,
    timeout: Duration,
    normalizer: Normalizer,
}

impl GoogleNewsFetcher {
    pub fn new(feed: &FeedConfig, scan: &ScanConfig) -> Result<Self> {
        let timeout = scan.fetch_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(feed.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint: Url::parse(&feed.endpoint)?,
            language: feed.language.clone(),
            region: feed.region.clone(),
            max_entries: scan.max_entries_per_keyword,
            timeout,
            normalizer: Normalizer::new(),
        })
    }

    /// Request timeout applied by the HTTP client.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the search URL for `keyword`, e.g. `?q=deprem&hl=tr&gl=TR&ceid=TR:tr`.
    pub fn search_url(&self, keyword: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("hl", &self.language)
            .append_pair("gl", &self.region)
            .append_pair("ceid", &format!("{}:{}", self.region, self.language));
        url
    }
}

#[async_trait]
impl Fetcher for GoogleNewsFetcher {
    async fn search(&self, keyword: &str) -> Result<Vec<RawEntry>> {
        let url = self.search_url(keyword);
        let response = self.client.get(url).send().await?;

        response.error_for_status_ref()?;

        let body = response.bytes().await?;
        self.normalizer.parse_feed(&body, self.max_entries)
    }
}
