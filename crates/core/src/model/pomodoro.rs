use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{PomodoroDayId, UserId};
use crate::model::subject::Subject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PomodoroSettingsError {
    #[error("work interval must be > 0 minutes")]
    InvalidWorkMinutes,
    #[error("short break must be > 0 minutes")]
    InvalidShortBreak,
    #[error("long break must be > 0 minutes")]
    InvalidLongBreak,
    #[error("cycles before a long break must be > 0")]
    InvalidCycles,
}

/// Interval lengths for the focus timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    work_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    cycles_before_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long_break: 4,
        }
    }
}

impl PomodoroSettings {
    /// # Errors
    ///
    /// Returns `PomodoroSettingsError` if any value is zero.
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        cycles_before_long_break: u32,
    ) -> Result<Self, PomodoroSettingsError> {
        if work_minutes == 0 {
            return Err(PomodoroSettingsError::InvalidWorkMinutes);
        }
        if short_break_minutes == 0 {
            return Err(PomodoroSettingsError::InvalidShortBreak);
        }
        if long_break_minutes == 0 {
            return Err(PomodoroSettingsError::InvalidLongBreak);
        }
        if cycles_before_long_break == 0 {
            return Err(PomodoroSettingsError::InvalidCycles);
        }
        Ok(Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            cycles_before_long_break,
        })
    }

    #[must_use]
    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    #[must_use]
    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    #[must_use]
    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    #[must_use]
    pub fn cycles_before_long_break(&self) -> u32 {
        self.cycles_before_long_break
    }
}

/// Completed focus intervals for one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroDay {
    pub id: PomodoroDayId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub sessions_completed: u32,
    pub total_focus_minutes: u32,
    pub subject: Option<Subject>,
    pub created_at: DateTime<Utc>,
}

/// One completed work interval to add to the day's tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroCompletion {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub focus_minutes: u32,
    pub subject: Option<Subject>,
    pub completed_at: DateTime<Utc>,
}

impl PomodoroDay {
    /// Fold a completion into this day's counters.
    pub fn absorb(&mut self, completion: &PomodoroCompletion) {
        self.sessions_completed = self.sessions_completed.saturating_add(1);
        self.total_focus_minutes = self
            .total_focus_minutes
            .saturating_add(completion.focus_minutes);
        if completion.subject.is_some() {
            self.subject = completion.subject;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn settings_reject_zero_values() {
        assert_eq!(
            PomodoroSettings::new(0, 5, 15, 4).unwrap_err(),
            PomodoroSettingsError::InvalidWorkMinutes
        );
        assert_eq!(
            PomodoroSettings::new(25, 5, 15, 0).unwrap_err(),
            PomodoroSettingsError::InvalidCycles
        );
        assert_eq!(PomodoroSettings::default().work_minutes(), 25);
    }

    #[test]
    fn absorb_keeps_previous_subject_when_none_given() {
        let date = fixed_now().date_naive();
        let mut day = PomodoroDay {
            id: PomodoroDayId::new(1),
            user_id: UserId::new(1),
            date,
            sessions_completed: 1,
            total_focus_minutes: 25,
            subject: Some(Subject::Chemistry),
            created_at: fixed_now(),
        };
        day.absorb(&PomodoroCompletion {
            user_id: UserId::new(1),
            date,
            focus_minutes: 25,
            subject: None,
            completed_at: fixed_now(),
        });
        assert_eq!(day.sessions_completed, 2);
        assert_eq!(day.total_focus_minutes, 50);
        assert_eq!(day.subject, Some(Subject::Chemistry));
    }
}
