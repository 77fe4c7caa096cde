use serde::{Deserialize, Serialize};

/// Keywords a fresh document starts with.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "kimdir",
    "ne zaman",
    "neden",
    "sevgilisi",
    "hamile",
    "yeni sezon",
    "serveti",
    "nerede",
    "nedir",
    "deprem",
    "ayrıldı",
    "temettü",
    "hisse",
    "çekiliş",
    "babası",
    "annesi",
    "yorumlar",
    "toki",
    "tatil",
];

/// Trim and lowercase a search term. Returns `None` when nothing is left.
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let keyword = raw.trim().to_lowercase();
    if keyword.is_empty() {
        None
    } else {
        Some(keyword)
    }
}

/// A keyword together with how many stored items it currently accounts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub name: String,
    pub count: usize,
}
