use std::sync::Arc;

use chrono::NaiveDate;
use storage::repository::{ChapterRepository, RevisionRepository, StorageError};
use tracker_core::model::{
    Chapter, ChapterId, ChapterUpdate, NewRevision, Progress, RevisionDraft, RevisionEntry,
    Subject, SyllabusProgress, UserId,
};
use tracker_core::time::instant_days_before;

use crate::Clock;
use crate::error::SyllabusError;

/// Recent revisions shown on the revision page.
pub const RECENT_REVISIONS: u32 = 20;

/// Chapters of one subject in syllabus order, with their progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectBoard {
    pub subject: Subject,
    pub chapters: Vec<Chapter>,
    pub progress: Progress,
}

/// The whole syllabus for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct SyllabusBoard {
    pub subjects: Vec<SubjectBoard>,
    pub overall: Progress,
}

impl SyllabusBoard {
    #[must_use]
    pub fn from_chapters(chapters: Vec<Chapter>) -> Self {
        let progress = SyllabusProgress::from_chapters(&chapters);
        let subjects = Subject::ALL
            .into_iter()
            .map(|subject| SubjectBoard {
                subject,
                chapters: chapters
                    .iter()
                    .filter(|c| c.subject() == subject)
                    .cloned()
                    .collect(),
                progress: progress.subject(subject),
            })
            .collect();
        Self {
            subjects,
            overall: progress.overall,
        }
    }

    #[must_use]
    pub fn subject(&self, subject: Subject) -> Option<&SubjectBoard> {
        self.subjects.iter().find(|s| s.subject == subject)
    }
}

/// Result of a checkbox update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterStatus {
    pub is_completed: bool,
    pub revision_count: u32,
}

/// Result of logging a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionReceipt {
    pub revision_count: u32,
    pub last_revised: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevisionOverview {
    pub chapters: Vec<Chapter>,
    pub needing_revision: Vec<Chapter>,
    pub recent: Vec<RevisionEntry>,
}

/// Chapter checkboxes and revision tracking.
#[derive(Clone)]
pub struct SyllabusService {
    clock: Clock,
    chapters: Arc<dyn ChapterRepository>,
    revisions: Arc<dyn RevisionRepository>,
    reminder_days: u32,
}

impl SyllabusService {
    #[must_use]
    pub fn new(
        clock: Clock,
        chapters: Arc<dyn ChapterRepository>,
        revisions: Arc<dyn RevisionRepository>,
        reminder_days: u32,
    ) -> Self {
        Self {
            clock,
            chapters,
            revisions,
            reminder_days,
        }
    }

    #[must_use]
    pub fn reminder_days(&self) -> u32 {
        self.reminder_days
    }

    /// # Errors
    ///
    /// Returns `SyllabusError::Storage` if repository access fails.
    pub async fn board(&self, user: UserId) -> Result<SyllabusBoard, SyllabusError> {
        let chapters = self.chapters.chapters_for_user(user).await?;
        Ok(SyllabusBoard::from_chapters(chapters))
    }

    /// Apply a partial flag update to a chapter the user owns.
    ///
    /// # Errors
    ///
    /// Returns `ChapterNotFound`, `Forbidden` for another user's chapter, or `Storage`.
    pub async fn update_chapter(
        &self,
        user: UserId,
        chapter_id: ChapterId,
        update: ChapterUpdate,
    ) -> Result<ChapterStatus, SyllabusError> {
        let mut chapter = self.owned_chapter(user, chapter_id).await?;
        chapter.apply_update(update, self.clock.now());
        self.chapters.update_chapter(&chapter).await?;
        tracing::debug!(user_id = %user, chapter_id = %chapter_id, "chapter flags updated");
        Ok(ChapterStatus {
            is_completed: chapter.is_completed(),
            revision_count: chapter.revision_count(),
        })
    }

    /// Record a revision: bumps the counter, marks the chapter revised and
    /// appends a revision log.
    ///
    /// # Errors
    ///
    /// Returns `Revision` for invalid input, `ChapterNotFound`, `Forbidden`, or `Storage`.
    pub async fn log_revision(
        &self,
        user: UserId,
        chapter_id: ChapterId,
        draft: RevisionDraft,
    ) -> Result<RevisionReceipt, SyllabusError> {
        let valid = draft.validate()?;
        let mut chapter = self.owned_chapter(user, chapter_id).await?;
        let now = self.clock.now();
        let revision_number = chapter.record_revision(now);

        self.revisions
            .record_revision(
                &chapter,
                NewRevision {
                    user_id: user,
                    chapter_id,
                    revised_at: now,
                    revision_number,
                    confidence: valid.confidence,
                    notes: valid.notes,
                },
            )
            .await?;

        tracing::info!(
            user_id = %user,
            chapter_id = %chapter_id,
            revision_number,
            "revision logged"
        );
        Ok(RevisionReceipt {
            revision_count: chapter.revision_count(),
            last_revised: now.date_naive(),
        })
    }

    /// # Errors
    ///
    /// Returns `SyllabusError::Storage` if repository access fails.
    pub async fn revision_overview(&self, user: UserId) -> Result<RevisionOverview, SyllabusError> {
        let chapters = self.chapters.chapters_for_user(user).await?;
        let now = self.clock.now();
        let needing_revision = chapters
            .iter()
            .filter(|c| c.needs_revision(now, self.reminder_days))
            .cloned()
            .collect();
        let recent = self
            .revisions
            .recent_revisions(user, RECENT_REVISIONS)
            .await?;
        Ok(RevisionOverview {
            chapters,
            needing_revision,
            recent,
        })
    }

    /// Number of revised chapters not revisited within the reminder window.
    ///
    /// # Errors
    ///
    /// Returns `SyllabusError::Storage` if repository access fails.
    pub async fn chapters_needing_revision(&self, user: UserId) -> Result<u64, SyllabusError> {
        let threshold = instant_days_before(self.clock.now(), self.reminder_days);
        Ok(self.chapters.count_needing_revision(user, threshold).await?)
    }

    async fn owned_chapter(
        &self,
        user: UserId,
        chapter_id: ChapterId,
    ) -> Result<Chapter, SyllabusError> {
        let chapter = match self.chapters.get_chapter(chapter_id).await {
            Ok(chapter) => chapter,
            Err(StorageError::NotFound) => return Err(SyllabusError::ChapterNotFound),
            Err(e) => return Err(e.into()),
        };
        if chapter.user_id() != user {
            tracing::warn!(
                user_id = %user,
                chapter_id = %chapter_id,
                "refused access to another user's chapter"
            );
            return Err(SyllabusError::Forbidden);
        }
        Ok(chapter)
    }
}
