use serde::{Deserialize, Serialize};

use crate::app::{NewswatchError, Result};

pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;

/// Automatic scan settings, persisted inside the data document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub auto_scan: bool,
    pub interval_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_scan: true,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

/// Partial settings change; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub auto_scan: Option<bool>,
    pub interval_minutes: Option<u32>,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes == Some(0) {
            return Err(NewswatchError::InvalidInput(
                "interval_minutes must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.auto_scan.is_none() && self.interval_minutes.is_none()
    }
}
