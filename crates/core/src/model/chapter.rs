use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterId, UserId};
use crate::model::subject::Subject;
use crate::time::instant_days_before;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter name cannot be empty")]
    EmptyName,

    #[error("chapter order must be >= 1")]
    InvalidOrder,
}

//
// ─── FLAGS ─────────────────────────────────────────────────────────────────────
//

/// The four study steps tracked for every chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ChapterFlags {
    pub ncert_read: bool,
    pub lecture_watched: bool,
    pub questions_solved: bool,
    pub revised: bool,
}

impl ChapterFlags {
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.ncert_read && self.lecture_watched && self.questions_solved && self.revised
    }
}

/// Partial flag update; absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterUpdate {
    #[serde(default)]
    pub ncert_read: Option<bool>,
    #[serde(default)]
    pub lecture_watched: Option<bool>,
    #[serde(default)]
    pub questions_solved: Option<bool>,
    #[serde(default)]
    pub revised: Option<bool>,
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// A syllabus chapter tracked for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    user_id: UserId,
    subject: Subject,
    name: String,
    order: u32,
    flags: ChapterFlags,
    revision_count: u32,
    last_revised_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Insert shape used when seeding a user's syllabus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChapter {
    pub user_id: UserId,
    pub subject: Subject,
    pub name: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl NewChapter {
    /// # Errors
    ///
    /// Returns `ChapterError` if the name is blank or the order is zero.
    pub fn new(
        user_id: UserId,
        subject: Subject,
        name: impl Into<String>,
        order: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ChapterError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ChapterError::EmptyName);
        }
        if order == 0 {
            return Err(ChapterError::InvalidOrder);
        }
        Ok(Self {
            user_id,
            subject,
            name,
            order,
            created_at,
        })
    }
}

impl Chapter {
    /// Rehydrate a chapter from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError` if the persisted name or order is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: ChapterId,
        user_id: UserId,
        subject: Subject,
        name: String,
        order: u32,
        flags: ChapterFlags,
        revision_count: u32,
        last_revised_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ChapterError> {
        if name.trim().is_empty() {
            return Err(ChapterError::EmptyName);
        }
        if order == 0 {
            return Err(ChapterError::InvalidOrder);
        }
        Ok(Self {
            id,
            user_id,
            subject,
            name,
            order,
            flags,
            revision_count,
            last_revised_at,
            created_at,
            updated_at,
        })
    }

    /// Promote a freshly inserted row into a chapter with no progress.
    #[must_use]
    pub fn from_new(id: ChapterId, new: NewChapter) -> Self {
        Self {
            id,
            user_id: new.user_id,
            subject: new.subject,
            name: new.name,
            order: new.order,
            flags: ChapterFlags::default(),
            revision_count: 0,
            last_revised_at: None,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Apply a checkbox update.
    ///
    /// Ticking `revised` counts as a revision every time it is sent as `true`,
    /// including when the flag was already set.
    pub fn apply_update(&mut self, update: ChapterUpdate, now: DateTime<Utc>) {
        if let Some(value) = update.ncert_read {
            self.flags.ncert_read = value;
        }
        if let Some(value) = update.lecture_watched {
            self.flags.lecture_watched = value;
        }
        if let Some(value) = update.questions_solved {
            self.flags.questions_solved = value;
        }
        if let Some(value) = update.revised {
            self.flags.revised = value;
            if value {
                self.revision_count = self.revision_count.saturating_add(1);
                self.last_revised_at = Some(now);
            }
        }
        self.updated_at = now;
    }

    /// Record an explicit revision and return the new revision number.
    pub fn record_revision(&mut self, now: DateTime<Utc>) -> u32 {
        self.revision_count = self.revision_count.saturating_add(1);
        self.last_revised_at = Some(now);
        self.flags.revised = true;
        self.updated_at = now;
        self.revision_count
    }

    /// True when the chapter was revised but not within the last `reminder_days`.
    #[must_use]
    pub fn needs_revision(&self, now: DateTime<Utc>, reminder_days: u32) -> bool {
        let threshold = instant_days_before(now, reminder_days);
        self.flags.revised && self.last_revised_at.is_some_and(|at| at < threshold)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.flags.all_done()
    }

    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn flags(&self) -> ChapterFlags {
        self.flags
    }

    #[must_use]
    pub fn revision_count(&self) -> u32 {
        self.revision_count
    }

    #[must_use]
    pub fn last_revised_at(&self) -> Option<DateTime<Utc>> {
        self.last_revised_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::time::fixed_now;

    fn chapter() -> Chapter {
        let new = NewChapter::new(UserId::new(1), Subject::Physics, "Vectors", 2, fixed_now())
            .unwrap();
        Chapter::from_new(ChapterId::new(10), new)
    }

    #[test]
    fn completion_requires_all_four_flags() {
        let mut ch = chapter();
        let now = fixed_now();
        ch.apply_update(
            ChapterUpdate {
                ncert_read: Some(true),
                lecture_watched: Some(true),
                questions_solved: Some(true),
                revised: None,
            },
            now,
        );
        assert!(!ch.is_completed());
        assert_eq!(ch.revision_count(), 0);

        ch.apply_update(
            ChapterUpdate {
                revised: Some(true),
                ..ChapterUpdate::default()
            },
            now,
        );
        assert!(ch.is_completed());
        assert_eq!(ch.revision_count(), 1);
        assert_eq!(ch.last_revised_at(), Some(now));
    }

    #[test]
    fn unticking_revised_keeps_counter() {
        let mut ch = chapter();
        let now = fixed_now();
        ch.apply_update(
            ChapterUpdate {
                revised: Some(true),
                ..ChapterUpdate::default()
            },
            now,
        );
        ch.apply_update(
            ChapterUpdate {
                revised: Some(false),
                ..ChapterUpdate::default()
            },
            now,
        );
        assert!(!ch.flags().revised);
        assert_eq!(ch.revision_count(), 1);
    }

    #[test]
    fn record_revision_sets_flag_and_increments() {
        let mut ch = chapter();
        assert_eq!(ch.record_revision(fixed_now()), 1);
        assert_eq!(ch.record_revision(fixed_now()), 2);
        assert!(ch.flags().revised);
    }

    #[test]
    fn needs_revision_after_reminder_window() {
        let mut ch = chapter();
        let revised_at = fixed_now();
        ch.record_revision(revised_at);

        assert!(!ch.needs_revision(revised_at + Duration::days(7), 7));
        assert!(ch.needs_revision(revised_at + Duration::days(7) + Duration::seconds(1), 7));
    }

    #[test]
    fn new_chapter_rejects_blank_name_and_zero_order() {
        let now = fixed_now();
        assert_eq!(
            NewChapter::new(UserId::new(1), Subject::Biology, "  ", 1, now).unwrap_err(),
            ChapterError::EmptyName
        );
        assert_eq!(
            NewChapter::new(UserId::new(1), Subject::Biology, "Cell", 0, now).unwrap_err(),
            ChapterError::InvalidOrder
        );
    }
}
