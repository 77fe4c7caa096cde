//! Foreground runner for automatic scans.
//!
//! Keeps the scheduler alive until SIGINT/SIGTERM and follows settings
//! changes written by other processes (e.g. `newswatch settings`).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::app::{AppContext, Result};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// How often persisted settings are re-read, in seconds (default: 30)
    pub settings_poll_secs: u64,
    /// Whether to run a scan immediately on start
    pub scan_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            settings_poll_secs: 30,
            scan_on_start: false,
        }
    }
}

/// Interval suffixes, largest first.
const UNITS: [(char, u64); 4] = [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

impl DaemonConfig {
    /// Poll period, kept between one second and one day.
    pub fn settings_poll(&self) -> Duration {
        Duration::from_secs(self.settings_poll_secs.clamp(1, 86_400))
    }

    /// Parse interval string like "1h", "30m", "45s", "1d". A bare number is seconds.
    pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
        let s = s.trim().to_lowercase();
        let (digits, unit_secs) = match s.chars().last() {
            Some(suffix) if suffix.is_ascii_alphabetic() => {
                let (_, secs) = UNITS
                    .iter()
                    .find(|(unit, _)| *unit == suffix)
                    .ok_or_else(|| format!("Unknown interval unit '{}' in {}", suffix, s))?;
                (&s[..s.len() - 1], *secs)
            }
            _ => (s.as_str(), 1),
        };

        let value: u64 = digits
            .parse()
            .map_err(|_| format!("Invalid interval: {}. Use format like '30s', '5m', '1h'", s))?;
        value
            .checked_mul(unit_secs)
            .ok_or_else(|| format!("Interval too large: {}", s))
    }

    /// Format interval for display using the largest unit that divides it.
    pub fn format_interval(secs: u64) -> String {
        UNITS
            .iter()
            .find(|(_, size)| secs >= *size && secs % size == 0)
            .map(|(unit, size)| format!("{}{}", secs / size, unit))
            .unwrap_or_else(|| format!("{}s", secs))
    }
}

/// Daemon runner
pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
}

impl Daemon {
    pub fn new(ctx: Arc<AppContext>, config: DaemonConfig) -> Self {
        Self { ctx, config }
    }

    /// Run until a shutdown signal arrives.
    pub async fn run(&self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let mut applied = self.ctx.service.start()?;

        info!(
            "newswatch started (data: {}, auto scan: {}, interval: {}, PID: {})",
            self.ctx.data_path.display(),
            applied.auto_scan,
            DaemonConfig::format_interval(u64::from(applied.interval_minutes) * 60),
            std::process::id()
        );

        if self.config.scan_on_start {
            self.run_scan().await;
        }

        let mut poll = interval(self.config.settings_poll());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        poll.tick().await; // Skip the first immediate tick

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = poll.tick() => {
                    match self.ctx.service.sync_settings(applied) {
                        Ok(current) => applied = current,
                        Err(e) => warn!("Failed to re-read settings: {}", e),
                    }
                }
            }
        }

        info!("Shutting down...");
        self.ctx.service.shutdown();
        Ok(())
    }

    async fn run_scan(&self) {
        let start = Utc::now();
        info!("Running initial scan...");

        match self.ctx.service.trigger_scan().await {
            Ok(count) => {
                let elapsed = Utc::now().signed_duration_since(start);
                info!(
                    "Initial scan complete: {} new items ({:.1}s)",
                    count,
                    elapsed.num_milliseconds() as f64 / 1000.0
                );
            }
            Err(e) => error!("Initial scan failed: {}", e),
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            _ => {
                warn!("Failed to set up signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
