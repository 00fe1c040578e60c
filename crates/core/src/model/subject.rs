use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown subject: {0}")]
pub struct UnknownSubject(pub String);

/// Exam subject a chapter, study log or focus interval belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Biology,
}

impl Subject {
    /// Canonical display order.
    pub const ALL: [Subject; 3] = [Subject::Physics, Subject::Chemistry, Subject::Biology];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
        }
    }

    /// Position in [`Subject::ALL`], used for ordering persisted rows.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Subject::Physics => 0,
            Subject::Chemistry => 1,
            Subject::Biology => 2,
        }
    }

    /// Parse an optional form value where an empty string means "no subject".
    ///
    /// # Errors
    ///
    /// Returns `UnknownSubject` for non-empty values that name no subject.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, UnknownSubject> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}
