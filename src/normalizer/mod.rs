use std::collections::HashSet;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{NewswatchError, Result};
use crate::domain::{Item, UNKNOWN_SOURCE};
use crate::fetcher::RawEntry;

/// Separator between headline and publisher in aggregated feed titles.
pub const SOURCE_SEPARATOR: &str = " - ";

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS/Atom body into raw entries, keeping at most `max_entries`.
    pub fn parse_feed(&self, body: &[u8], max_entries: usize) -> Result<Vec<RawEntry>> {
        let feed = parser::parse(body).map_err(|e| NewswatchError::FeedParse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .take(max_entries)
            .map(|entry| RawEntry {
                title: entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string())
                    .unwrap_or_default(),
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                published: entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc)),
            })
            .collect();

        Ok(entries)
    }

    /// Turn a raw entry into an [`Item`], or `None` when it has no link or the
    /// link was already seen.
    pub fn normalize(
        &self,
        keyword: &str,
        raw: RawEntry,
        seen: &HashSet<String>,
        fetched_at: DateTime<Utc>,
    ) -> Option<Item> {
        let link = raw.link.trim();
        if link.is_empty() || seen.contains(link) {
            return None;
        }

        let (title, source) = split_title(&raw.title);

        let mut item = Item::new(link, keyword, fetched_at);
        item.title = title;
        item.source = source;
        item.published_at = raw.published.unwrap_or(fetched_at);
        Some(item)
    }
}

/// Split "Headline - Publisher" on the last separator.
pub fn split_title(full: &str) -> (String, String) {
    match full.rsplit_once(SOURCE_SEPARATOR) {
        Some((title, source)) => (title.trim().to_string(), source.trim().to_string()),
        None => (full.trim().to_string(), UNKNOWN_SOURCE.to_string()),
    }
}
