pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ItemFilter;
use crate::service::DEFAULT_ITEM_LIMIT;

#[derive(Parser)]
#[command(name = "newswatch")]
#[command(about = "Watch a news search feed for a set of keywords", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/newswatch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data document, overriding the configured location
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show counters and scan settings
    Status,
    /// List stored items
    Items {
        /// Which items to show: all, new or saved
        #[arg(short, long, default_value = "all")]
        filter: ItemFilter,

        /// Only items found for this keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Maximum number of items to print
        #[arg(short, long, default_value_t = DEFAULT_ITEM_LIMIT)]
        limit: usize,
    },
    /// List keywords with their item counts
    Keywords,
    /// Add a keyword
    Add {
        /// Keyword to search for
        keyword: String,
    },
    /// Remove a keyword
    Remove {
        /// Keyword to stop searching for
        keyword: String,
    },
    /// Scan all keywords now
    Scan,
    /// Toggle the saved state of an item
    Save {
        /// Item id as printed by `items`
        id: String,
    },
    /// Change automatic scan settings
    Settings {
        /// Enable or disable automatic scans
        #[arg(long)]
        auto_scan: Option<bool>,

        /// Minutes between automatic scans
        #[arg(short, long)]
        interval: Option<u32>,
    },
    /// Run automatic scans in the foreground until interrupted
    Run {
        /// Scan once immediately on start
        #[arg(long)]
        scan_now: bool,

        /// How often to re-read settings changed by other processes (e.g. "30s", "1m")
        #[arg(long, default_value = "30s")]
        settings_poll: String,
    },
}
