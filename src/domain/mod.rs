pub mod document;
pub mod item;
pub mod keyword;
pub mod settings;

pub use document::{Document, SaveAction, MAX_ITEMS, MAX_SEEN_URLS};
pub use item::{Item, ItemFilter, UNKNOWN_SOURCE};
pub use keyword::{normalize_keyword, KeywordCount, DEFAULT_KEYWORDS};
pub use settings::{Settings, SettingsUpdate};
