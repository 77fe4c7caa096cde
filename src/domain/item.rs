use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Source label used when a headline carries no " - Source" suffix.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// One discovered news entry, tied to the keyword whose search produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub keyword: String,
    pub is_new: bool,
    pub discovered_at: DateTime<Utc>,
}

impl Item {
    pub fn new(url: &str, keyword: &str, discovered_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(url),
            title: String::new(),
            source: UNKNOWN_SOURCE.to_string(),
            url: url.trim().to_string(),
            published_at: discovered_at,
            keyword: keyword.to_string(),
            is_new: true,
            discovered_at,
        }
    }

    /// Generate a deterministic ID from the entry URL
    pub fn generate_id(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.trim().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// Which slice of the stored items a listing should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    #[default]
    All,
    New,
    Saved,
}

impl FromStr for ItemFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ItemFilter::All),
            "new" => Ok(ItemFilter::New),
            "saved" => Ok(ItemFilter::Saved),
            other => Err(format!(
                "Invalid filter: {}. Use 'all', 'new' or 'saved'",
                other
            )),
        }
    }
}
