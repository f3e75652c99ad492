use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_SESSIONS_UNTIL_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be at least one minute")]
    ZeroDuration { field: &'static str },
    #[error("sessions until long break must be at least 1")]
    ZeroSessions,
}

/// Phase durations in whole minutes. Replaced wholesale on reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            sessions_until_long_break: DEFAULT_SESSIONS_UNTIL_LONG_BREAK,
        }
    }
}

impl Settings {
    pub fn new(work: u32, short: u32, long: u32, sessions: u32) -> Result<Self, SettingsError> {
        let settings = Self {
            work_minutes: work,
            break_minutes: short,
            long_break_minutes: long,
            sessions_until_long_break: sessions,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let durations = [
            ("work_minutes", self.work_minutes),
            ("break_minutes", self.break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        if let Some(&(field, _)) = durations.iter().find(|(_, v)| *v == 0) {
            return Err(SettingsError::ZeroDuration { field });
        }
        if self.sessions_until_long_break == 0 {
            return Err(SettingsError::ZeroSessions);
        }
        Ok(())
    }

    pub fn work_secs(&self) -> u32 {
        self.work_minutes.saturating_mul(60)
    }

    pub fn break_secs(&self) -> u32 {
        self.break_minutes.saturating_mul(60)
    }

    pub fn long_break_secs(&self) -> u32 {
        self.long_break_minutes.saturating_mul(60)
    }
}
