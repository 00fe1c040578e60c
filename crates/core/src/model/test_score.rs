use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{TestScoreId, UserId};
use crate::model::progress::round_to;
use crate::model::subject::Subject;
use crate::model::user::normalize_optional;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestScoreError {
    #[error("Test name must be between 1 and 256 characters")]
    InvalidName,

    #[error("{subject} score must be between 0 and 1000")]
    InvalidSubjectScore { subject: Subject },

    #[error("{subject} total marks must be between 1 and 1000")]
    InvalidSubjectTotal { subject: Subject },

    #[error("{subject} score cannot exceed {subject} total marks")]
    SubjectScoreExceedsTotal { subject: Subject },

    #[error("Total score must be between 0 and 2000")]
    InvalidTotalScore,

    #[error("Total marks must be between 1 and 2000")]
    InvalidTotalMarks,

    #[error("Total score cannot exceed total marks")]
    TotalScoreExceedsMarks,

    #[error("Notes must be at most 1000 characters")]
    NotesTooLong,

    #[error("unknown test type: {0}")]
    UnknownTestType(String),
}

pub const NAME_MAX: usize = 256;
pub const SUBJECT_MAX: u32 = 1000;
pub const TOTAL_MAX: u32 = 2000;
pub const NOTES_MAX: usize = 1000;

//
// ─── TEST TYPE ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    FullLength,
    ChapterTest,
    SubjectTest,
    OnlineTest,
    OfflineTest,
    Other,
}

impl TestType {
    pub const ALL: [TestType; 6] = [
        TestType::FullLength,
        TestType::ChapterTest,
        TestType::SubjectTest,
        TestType::OnlineTest,
        TestType::OfflineTest,
        TestType::Other,
    ];

    /// Stored value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::FullLength => "Full Length",
            TestType::ChapterTest => "Chapter Test",
            TestType::SubjectTest => "Subject Test",
            TestType::OnlineTest => "Online Test",
            TestType::OfflineTest => "Offline Test",
            TestType::Other => "Other",
        }
    }

    /// Human label for select boxes.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TestType::FullLength => "Full Length Mock Test",
            TestType::ChapterTest => "Chapter-wise Test",
            TestType::SubjectTest => "Subject Test",
            TestType::OnlineTest => "Online Test Series",
            TestType::OfflineTest => "Offline Mock Test",
            TestType::Other => "Other",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = TestScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| TestScoreError::UnknownTestType(s.to_string()))
    }
}

//
// ─── SCORES ────────────────────────────────────────────────────────────────────
//

/// Optional per-subject marks. Either half may be missing on the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectMarks {
    pub score: Option<u32>,
    pub total: Option<u32>,
}

impl SubjectMarks {
    #[must_use]
    pub fn new(score: Option<u32>, total: Option<u32>) -> Self {
        Self { score, total }
    }

    /// Percentage rounded to one decimal when both halves are present.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        match (self.score, self.total) {
            (Some(score), Some(total)) if total > 0 => Some(round_to(
                f64::from(score) / f64::from(total) * 100.0,
                1,
            )),
            _ => None,
        }
    }

    fn validate(self, subject: Subject) -> Result<Self, TestScoreError> {
        if self.score.is_some_and(|s| s > SUBJECT_MAX) {
            return Err(TestScoreError::InvalidSubjectScore { subject });
        }
        if self.total.is_some_and(|t| t == 0 || t > SUBJECT_MAX) {
            return Err(TestScoreError::InvalidSubjectTotal { subject });
        }
        if let (Some(score), Some(total)) = (self.score, self.total)
            && score > total
        {
            return Err(TestScoreError::SubjectScoreExceedsTotal { subject });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestScoreDraft {
    pub name: String,
    pub date: NaiveDate,
    pub test_type: TestType,
    pub physics: SubjectMarks,
    pub chemistry: SubjectMarks,
    pub biology: SubjectMarks,
    pub total_score: u32,
    pub total_marks: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTestScore {
    pub user_id: UserId,
    pub name: String,
    pub date: NaiveDate,
    pub test_type: TestType,
    pub physics: SubjectMarks,
    pub chemistry: SubjectMarks,
    pub biology: SubjectMarks,
    pub total_score: u32,
    pub total_marks: u32,
    pub percentage: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TestScoreDraft {
    /// Validate the draft and compute its percentage.
    ///
    /// # Errors
    ///
    /// Returns the first `TestScoreError` found.
    pub fn validate(
        self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<NewTestScore, TestScoreError> {
        let name = self.name.trim().to_string();
        let name_len = name.chars().count();
        if name_len == 0 || name_len > NAME_MAX {
            return Err(TestScoreError::InvalidName);
        }
        let physics = self.physics.validate(Subject::Physics)?;
        let chemistry = self.chemistry.validate(Subject::Chemistry)?;
        let biology = self.biology.validate(Subject::Biology)?;

        if self.total_score > TOTAL_MAX {
            return Err(TestScoreError::InvalidTotalScore);
        }
        if self.total_marks == 0 || self.total_marks > TOTAL_MAX {
            return Err(TestScoreError::InvalidTotalMarks);
        }
        if self.total_score > self.total_marks {
            return Err(TestScoreError::TotalScoreExceedsMarks);
        }

        let notes = normalize_optional(self.notes);
        if notes.as_ref().is_some_and(|n| n.chars().count() > NOTES_MAX) {
            return Err(TestScoreError::NotesTooLong);
        }

        Ok(NewTestScore {
            user_id,
            name,
            date: self.date,
            test_type: self.test_type,
            physics,
            chemistry,
            biology,
            total_score: self.total_score,
            total_marks: self.total_marks,
            percentage: score_percentage(self.total_score, self.total_marks),
            notes,
            created_at: now,
        })
    }
}

/// Overall percentage with two decimals; 0 when there are no marks.
#[must_use]
pub fn score_percentage(score: u32, marks: u32) -> f64 {
    if marks == 0 {
        return 0.0;
    }
    round_to(f64::from(score) / f64::from(marks) * 100.0, 2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestScore {
    pub id: TestScoreId,
    pub user_id: UserId,
    pub name: String,
    pub date: NaiveDate,
    pub test_type: TestType,
    pub physics: SubjectMarks,
    pub chemistry: SubjectMarks,
    pub biology: SubjectMarks,
    pub total_score: u32,
    pub total_marks: u32,
    pub percentage: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TestScore {
    #[must_use]
    pub fn from_new(id: TestScoreId, new: NewTestScore) -> Self {
        Self {
            id,
            user_id: new.user_id,
            name: new.name,
            date: new.date,
            test_type: new.test_type,
            physics: new.physics,
            chemistry: new.chemistry,
            biology: new.biology,
            total_score: new.total_score,
            total_marks: new.total_marks,
            percentage: new.percentage,
            notes: new.notes,
            created_at: new.created_at,
        }
    }

    #[must_use]
    pub fn marks(&self, subject: Subject) -> SubjectMarks {
        match subject {
            Subject::Physics => self.physics,
            Subject::Chemistry => self.chemistry,
            Subject::Biology => self.biology,
        }
    }

    #[must_use]
    pub fn subject_percentage(&self, subject: Subject) -> Option<f64> {
        self.marks(subject).percentage()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn draft() -> TestScoreDraft {
        TestScoreDraft {
            name: "Mock 1".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            test_type: TestType::FullLength,
            physics: SubjectMarks::new(Some(120), Some(180)),
            chemistry: SubjectMarks::default(),
            biology: SubjectMarks::new(Some(300), Some(360)),
            total_score: 600,
            total_marks: 720,
            notes: None,
        }
    }

    #[test]
    fn computes_percentage_with_two_decimals() {
        let new = draft().validate(UserId::new(1), fixed_now()).unwrap();
        assert_eq!(new.percentage, 83.33);
        assert_eq!(score_percentage(0, 0), 0.0);
    }

    #[test]
    fn subject_percentages_require_both_halves() {
        let new = draft().validate(UserId::new(1), fixed_now()).unwrap();
        let score = TestScore::from_new(TestScoreId::new(1), new);
        assert_eq!(score.subject_percentage(Subject::Physics), Some(66.7));
        assert_eq!(score.subject_percentage(Subject::Chemistry), None);
        assert_eq!(score.subject_percentage(Subject::Biology), Some(83.3));
    }

    #[test]
    fn rejects_scores_above_totals() {
        let mut d = draft();
        d.total_score = 800;
        assert_eq!(
            d.validate(UserId::new(1), fixed_now()).unwrap_err(),
            TestScoreError::TotalScoreExceedsMarks
        );

        let mut d = draft();
        d.physics = SubjectMarks::new(Some(200), Some(180));
        assert_eq!(
            d.validate(UserId::new(1), fixed_now()).unwrap_err(),
            TestScoreError::SubjectScoreExceedsTotal {
                subject: Subject::Physics
            }
        );
    }

    #[test]
    fn rejects_blank_name_and_zero_marks() {
        let mut d = draft();
        d.name = "   ".into();
        assert_eq!(
            d.validate(UserId::new(1), fixed_now()).unwrap_err(),
            TestScoreError::InvalidName
        );

        let mut d = draft();
        d.total_marks = 0;
        d.total_score = 0;
        assert_eq!(
            d.validate(UserId::new(1), fixed_now()).unwrap_err(),
            TestScoreError::InvalidTotalMarks
        );
    }

    #[test]
    fn test_type_round_trips_through_storage_string() {
        for t in TestType::ALL {
            assert_eq!(t.as_str().parse::<TestType>().unwrap(), t);
        }
        assert!("Weekly".parse::<TestType>().is_err());
    }
}
