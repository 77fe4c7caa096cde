pub mod google_news;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::app::Result;

pub use google_news::GoogleNewsFetcher;

/// One entry as returned by a feed search, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

/// Search capability: fetch the current entries for a query.
#[async_trait]
pub trait Fetcher {
    async fn search(&self, keyword: &str) -> Result<Vec<RawEntry>>;
}
