use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterId, RevisionId, UserId};
use crate::model::subject::Subject;
use crate::model::user::normalize_optional;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RevisionError {
    #[error("confidence level must be between 1 and 5, got {0}")]
    InvalidConfidence(u8),

    #[error("Notes must be at most 500 characters")]
    NotesTooLong,
}

pub const REVISION_NOTES_MAX: usize = 500;

/// Self-reported recall confidence, 1 (very low) to 5 (very high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Confidence(u8);

impl Confidence {
    /// # Errors
    ///
    /// Returns `RevisionError::InvalidConfidence` outside 1..=5.
    pub fn new(value: u8) -> Result<Self, RevisionError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RevisionError::InvalidConfidence(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Low",
            2 => "Low",
            3 => "Medium",
            4 => "High",
            _ => "Very High",
        }
    }
}

/// Body of a "log revision" request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RevisionDraft {
    #[serde(default)]
    pub confidence_level: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRevision {
    pub confidence: Option<Confidence>,
    pub notes: Option<String>,
}

impl RevisionDraft {
    /// A confidence of `0` is treated as "not given".
    ///
    /// # Errors
    ///
    /// Returns `RevisionError` for confidence above 5 or notes that are too long.
    pub fn validate(self) -> Result<ValidRevision, RevisionError> {
        let confidence = self
            .confidence_level
            .filter(|v| *v != 0)
            .map(Confidence::new)
            .transpose()?;
        let notes = normalize_optional(self.notes);
        if notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > REVISION_NOTES_MAX)
        {
            return Err(RevisionError::NotesTooLong);
        }
        Ok(ValidRevision { confidence, notes })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRevision {
    pub user_id: UserId,
    pub chapter_id: ChapterId,
    pub revised_at: DateTime<Utc>,
    pub revision_number: u32,
    pub confidence: Option<Confidence>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionLog {
    pub id: RevisionId,
    pub user_id: UserId,
    pub chapter_id: ChapterId,
    pub revised_at: DateTime<Utc>,
    pub revision_number: u32,
    pub confidence: Option<Confidence>,
    pub notes: Option<String>,
}

/// A revision log joined with the chapter it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    pub log: RevisionLog,
    pub subject: Subject,
    pub chapter_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_confidence_means_unset() {
        let valid = RevisionDraft {
            confidence_level: Some(0),
            notes: Some(" ok ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(valid.confidence, None);
        assert_eq!(valid.notes.as_deref(), Some("ok"));
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let err = RevisionDraft {
            confidence_level: Some(6),
            notes: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, RevisionError::InvalidConfidence(6));
        assert_eq!(Confidence::new(4).unwrap().label(), "High");
    }
}
