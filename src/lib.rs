//! # newswatch
//!
//! Periodically searches a news feed for a set of keywords and keeps what it
//! hasn't seen before.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler → Scanner → Fetcher → Normalizer → Store
//!                         ↑
//!          NewsService (queries, mutations, manual scans)
//! ```
//!
//! - [`fetcher`]: keyword search capability and the Google News implementation
//! - [`normalizer`]: feed parsing and raw entry → [`Item`](domain::Item)
//! - [`scanner`]: one scan cycle across all keywords
//! - [`scheduler`]: recurring scans, reconfigurable at runtime
//! - [`store`]: the persisted JSON document
//! - [`service`]: operations for presentation layers
//!
//! ## Quick Start
//!
//! ```bash
//! newswatch add "deprem"
//! newswatch scan
//! newswatch items --filter new
//! newswatch settings --interval 15
//! newswatch run
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires store, fetcher, scanner and service.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration file (`~/.config/newswatch/config.toml`).
pub mod config;

/// Foreground runner: keeps automatic scans going until interrupted.
pub mod daemon;

/// Core domain models.
///
/// - [`Item`](domain::Item): one discovered entry with a URL-derived SHA256 id
/// - [`Document`](domain::Document): the whole persisted state
/// - [`Settings`](domain::Settings): automatic scan settings
pub mod domain;

/// Keyword search.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait returning raw entries for a query
/// - [`GoogleNewsFetcher`](fetcher::GoogleNewsFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and item normalization.
pub mod normalizer;

/// Scan engine.
pub mod scanner;

/// Recurring scan timer.
pub mod scheduler;

/// Query and mutation operations.
pub mod service;

/// Document persistence.
///
/// - [`Store`](store::Store): load/save of the whole document
/// - [`JsonStore`](store::JsonStore): JSON file with atomic replace
/// - [`SharedStore`](store::SharedStore): serialized mutations, lock-free snapshots
pub mod store;
