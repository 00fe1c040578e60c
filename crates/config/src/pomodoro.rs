use serde::{Deserialize, Serialize};
use tracker_core::model::PomodoroSettings;

use crate::ConfigError;

const fn default_work() -> u32 {
    25
}

const fn default_short_break() -> u32 {
    5
}

const fn default_long_break() -> u32 {
    15
}

const fn default_cycles() -> u32 {
    4
}

/// Timer lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    #[serde(default = "default_cycles")]
    pub cycles_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            cycles_before_long_break: default_cycles(),
        }
    }
}

impl PomodoroConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when any length is zero.
    pub fn settings(&self) -> Result<PomodoroSettings, ConfigError> {
        PomodoroSettings::new(
            self.work_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
            self.cycles_before_long_break,
        )
        .map_err(|e| ConfigError::invalid("pomodoro", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_timer_defaults() {
        let settings = PomodoroConfig::default().settings().expect("valid");
        assert_eq!(settings, PomodoroSettings::default());
    }

    #[test]
    fn zero_lengths_are_invalid() {
        let config = PomodoroConfig {
            short_break_minutes: 0,
            ..PomodoroConfig::default()
        };
        assert!(matches!(
            config.settings(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
