use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::model::ids::{StudyLogId, UserId};
use crate::model::progress::round_to;
use crate::model::subject::Subject;
use crate::model::user::normalize_optional;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyLogError {
    #[error("Duration must be between 1 and 1440 minutes")]
    InvalidDuration,

    #[error("Notes must be at most 500 characters")]
    NotesTooLong,
}

pub const MAX_DURATION_MINUTES: u32 = 1440;
pub const MAX_NOTES: usize = 500;
/// Streak counting stops after this many days.
pub const MAX_STREAK_DAYS: u32 = 366;

/// Study session as entered on the log form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyLogDraft {
    pub date: NaiveDate,
    pub subject: Option<Subject>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

/// Validated study session ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudyLog {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub subject: Option<Subject>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StudyLogDraft {
    /// # Errors
    ///
    /// Returns `StudyLogError` if the duration or notes are out of range.
    pub fn validate(
        self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<NewStudyLog, StudyLogError> {
        if !(1..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(StudyLogError::InvalidDuration);
        }
        let notes = normalize_optional(self.notes);
        if notes.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTES) {
            return Err(StudyLogError::NotesTooLong);
        }
        Ok(NewStudyLog {
            user_id,
            date: self.date,
            subject: self.subject,
            duration_minutes: self.duration_minutes,
            notes,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyLog {
    pub id: StudyLogId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub subject: Option<Subject>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StudyLog {
    #[must_use]
    pub fn from_new(id: StudyLogId, new: NewStudyLog) -> Self {
        Self {
            id,
            user_id: new.user_id,
            date: new.date,
            subject: new.subject,
            duration_minutes: new.duration_minutes,
            notes: new.notes,
            created_at: new.created_at,
        }
    }
}

/// Aggregate over all of a user's study logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudyTotals {
    pub total_minutes: u64,
    pub sessions: u64,
}

impl StudyTotals {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_hours(&self) -> f64 {
        round_to(self.total_minutes as f64 / 60.0, 1)
    }

    /// Average session length in hours, 0 when nothing is logged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_hours(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        let avg_minutes = self.total_minutes as f64 / self.sessions as f64;
        round_to(avg_minutes / 60.0, 1)
    }
}

/// Hours with one decimal, as shown on dashboards.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: u64) -> f64 {
    round_to(minutes as f64 / 60.0, 1)
}

/// Consecutive days, ending `today`, that have at least one study log.
///
/// `dates` may be unsorted and contain duplicates.
#[must_use]
pub fn study_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut check = today;
    while streak < MAX_STREAK_DAYS && dates.contains(&check) {
        streak += 1;
        check -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn draft(minutes: u32) -> StudyLogDraft {
        StudyLogDraft {
            date: day(1),
            subject: Some(Subject::Physics),
            duration_minutes: minutes,
            notes: Some("  ".into()),
        }
    }

    #[test]
    fn validates_duration_bounds() {
        assert_eq!(
            draft(0).validate(UserId::new(1), fixed_now()).unwrap_err(),
            StudyLogError::InvalidDuration
        );
        assert_eq!(
            draft(1441).validate(UserId::new(1), fixed_now()).unwrap_err(),
            StudyLogError::InvalidDuration
        );
        let ok = draft(1440).validate(UserId::new(1), fixed_now()).unwrap();
        assert_eq!(ok.notes, None);
    }

    #[test]
    fn rejects_long_notes() {
        let mut d = draft(30);
        d.notes = Some("x".repeat(501));
        assert_eq!(
            d.validate(UserId::new(1), fixed_now()).unwrap_err(),
            StudyLogError::NotesTooLong
        );
    }

    #[test]
    fn streak_counts_back_from_today() {
        let dates = vec![day(10), day(9), day(9), day(8), day(6)];
        assert_eq!(study_streak(&dates, day(10)), 3);
        assert_eq!(study_streak(&dates, day(11)), 0);
        assert_eq!(study_streak(&[], day(10)), 0);
    }

    #[test]
    fn totals_report_hours() {
        let totals = StudyTotals {
            total_minutes: 250,
            sessions: 2,
        };
        assert_eq!(totals.total_hours(), 4.2);
        assert_eq!(totals.average_hours(), 2.1);
        assert_eq!(StudyTotals::default().average_hours(), 0.0);
    }
}
