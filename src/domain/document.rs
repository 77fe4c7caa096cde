use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{NewswatchError, Result};
use crate::domain::keyword::{normalize_keyword, KeywordCount, DEFAULT_KEYWORDS};
use crate::domain::settings::{Settings, SettingsUpdate, DEFAULT_INTERVAL_MINUTES};
use crate::domain::{Item, ItemFilter};

/// Maximum number of items kept in the document, newest first.
pub const MAX_ITEMS: usize = 1000;

/// Maximum number of URLs remembered for deduplication.
pub const MAX_SEEN_URLS: usize = 5000;

/// The whole persisted aggregate. Loaded in full before every operation and
/// written back in full after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub keywords: Vec<String>,
    pub news: Vec<Item>,
    pub saved_ids: Vec<String>,
    pub scan_count: u64,
    pub last_scan_time: Option<DateTime<Utc>>,
    pub auto_scan: bool,
    pub interval_minutes: u32,
    /// Oldest first; new URLs are appended.
    pub seen_urls: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            news: Vec::new(),
            saved_ids: Vec::new(),
            scan_count: 0,
            last_scan_time: None,
            auto_scan: true,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            seen_urls: Vec::new(),
        }
    }
}

/// Outcome of toggling an item's saved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveAction {
    Saved,
    Removed,
}

impl Document {
    pub fn settings(&self) -> Settings {
        Settings {
            auto_scan: self.auto_scan,
            interval_minutes: self.interval_minutes,
        }
    }

    pub fn apply_settings(&mut self, update: &SettingsUpdate) -> Result<Settings> {
        update.validate()?;
        if let Some(auto_scan) = update.auto_scan {
            self.auto_scan = auto_scan;
        }
        if let Some(interval) = update.interval_minutes {
            self.interval_minutes = interval;
        }
        Ok(self.settings())
    }

    pub fn seen_set(&self) -> HashSet<String> {
        self.seen_urls.iter().cloned().collect()
    }

    /// Fold one scan's worth of new items into the document.
    ///
    /// `fresh` must already be ordered newest-first. Items whose URL is already
    /// known are dropped. Returns how many items were actually added.
    pub fn merge_scan(&mut self, mut fresh: Vec<Item>, scanned_at: DateTime<Utc>) -> usize {
        for item in &mut self.news {
            item.is_new = false;
        }

        let mut seen = self.seen_set();
        fresh.retain(|item| seen.insert(item.url.clone()));
        for item in &mut fresh {
            item.is_new = true;
        }
        // Oldest first, so the newest URLs are the last to be evicted.
        self.seen_urls
            .extend(fresh.iter().rev().map(|item| item.url.clone()));

        let added = fresh.len();
        fresh.append(&mut self.news);
        fresh.truncate(MAX_ITEMS);
        self.news = fresh;

        if self.seen_urls.len() > MAX_SEEN_URLS {
            let overflow = self.seen_urls.len() - MAX_SEEN_URLS;
            self.seen_urls.drain(..overflow);
        }

        self.scan_count += 1;
        self.last_scan_time = Some(scanned_at);
        added
    }

    pub fn add_keyword(&mut self, raw: &str) -> Result<String> {
        let keyword = normalize_keyword(raw)
            .ok_or_else(|| NewswatchError::InvalidInput("keyword cannot be empty".into()))?;

        if self
            .keywords
            .iter()
            .any(|existing| existing.to_lowercase() == keyword)
        {
            return Err(NewswatchError::Duplicate(keyword));
        }

        self.keywords.push(keyword.clone());
        Ok(keyword)
    }

    /// Remove every exact match. Returns how many entries were removed.
    pub fn remove_keyword(&mut self, keyword: &str) -> usize {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        before - self.keywords.len()
    }

    pub fn toggle_saved(&mut self, item_id: &str) -> SaveAction {
        if self.saved_ids.iter().any(|id| id == item_id) {
            self.saved_ids.retain(|id| id != item_id);
            SaveAction::Removed
        } else {
            self.saved_ids.push(item_id.to_string());
            SaveAction::Saved
        }
    }

    pub fn is_saved(&self, item_id: &str) -> bool {
        self.saved_ids.iter().any(|id| id == item_id)
    }

    /// Items matching `filter` and, when given, exactly `keyword`.
    pub fn filter_items(&self, filter: ItemFilter, keyword: Option<&str>) -> Vec<&Item> {
        let saved: HashSet<&str> = match filter {
            ItemFilter::Saved => self.saved_ids.iter().map(String::as_str).collect(),
            _ => HashSet::new(),
        };

        self.news
            .iter()
            .filter(|item| match filter {
                ItemFilter::All => true,
                ItemFilter::New => item.is_new,
                ItemFilter::Saved => saved.contains(item.id.as_str()),
            })
            .filter(|item| keyword.map_or(true, |kw| item.keyword == kw))
            .collect()
    }

    pub fn keyword_counts(&self) -> Vec<KeywordCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in &self.news {
            *counts.entry(item.keyword.as_str()).or_default() += 1;
        }

        self.keywords
            .iter()
            .map(|name| KeywordCount {
                name: name.clone(),
                count: counts.get(name.as_str()).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn new_count(&self) -> usize {
        self.news.iter().filter(|item| item.is_new).count()
    }
}
