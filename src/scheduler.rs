//! Recurring automatic scans.
//!
//! The scheduler is either idle or owns exactly one timer task. Reconfiguring
//! cancels the timer and, when auto-scan is enabled, installs a fresh one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::domain::Settings;
use crate::scanner::Scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active { interval: Duration },
}

struct ActiveTimer {
    interval: Duration,
    handle: JoinHandle<()>,
}

pub struct Scheduler {
    scanner: Arc<Scanner>,
    timer: Mutex<Option<ActiveTimer>>,
}

impl Scheduler {
    pub fn new(scanner: Arc<Scanner>) -> Self {
        Self {
            scanner,
            timer: Mutex::new(None),
        }
    }

    /// Replace the current timer according to `settings`.
    ///
    /// A scan already running when this is called is left to finish; only the
    /// timer that would start the next one is cancelled.
    pub fn configure(&self, settings: &Settings) {
        let mut slot = match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(previous) = slot.take() {
            previous.handle.abort();
            debug!(interval_secs = previous.interval.as_secs(), "auto scan timer cancelled");
        }

        if !settings.auto_scan {
            info!("Auto scan disabled");
            return;
        }

        let interval = interval_for(settings);
        let scanner = self.scanner.clone();
        let handle = tokio::spawn(async move {
            run_timer(scanner, interval).await;
        });

        info!(
            "Auto scan enabled: every {} minute(s)",
            interval.as_secs() / 60
        );
        *slot = Some(ActiveTimer { interval, handle });
    }

    pub fn state(&self) -> SchedulerState {
        let slot = match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match slot.as_ref() {
            Some(timer) => SchedulerState::Active {
                interval: timer.interval,
            },
            None => SchedulerState::Idle,
        }
    }

    /// Cancel the timer, leaving the scheduler idle.
    pub fn stop(&self) {
        self.configure(&Settings {
            auto_scan: false,
            ..Settings::default()
        });
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(timer) = slot.take() {
                timer.handle.abort();
            }
        }
    }
}

fn interval_for(settings: &Settings) -> Duration {
    Duration::from_secs(u64::from(settings.interval_minutes.max(1)) * 60)
}

async fn run_timer(scanner: Arc<Scanner>, period: Duration) {
    // First tick one full period from now, not immediately.
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        timer.tick().await;

        // The scan gets its own task so cancelling this timer never cuts it short.
        let scanner = scanner.clone();
        tokio::spawn(async move {
            match scanner.try_run_scan().await {
                Some(Ok(count)) => debug!(new = count, "scheduled scan finished"),
                Some(Err(e)) => error!("Scheduled scan failed: {}", e),
                None => debug!("Scan already running, skipping this tick"),
            }
        });
    }
}
