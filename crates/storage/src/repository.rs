use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracker_core::model::{
    AdminLogEntry, Chapter, ChapterId, NewAdminLog, NewChapter, NewRevision, NewStudyLog,
    NewTestScore, PomodoroCompletion, PomodoroDay, RevisionEntry, RevisionLog, StudyLog,
    StudyTotals, TestScore, UserAccount, UserId,
};

use crate::memory::InMemoryRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a user account. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub target_exam_year: Option<u16>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    #[must_use]
    pub fn into_account(self, id: UserId) -> UserAccount {
        UserAccount {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            target_exam_year: self.target_exam_year,
            is_active: self.is_active,
            is_admin: self.is_admin,
            created_at: self.created_at,
            last_login: None,
            approved_at: None,
            approved_by: None,
        }
    }
}

/// Which accounts a user listing covers. Administrators are never included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    Members,
    Active,
    Pending,
}

impl UserFilter {
    #[must_use]
    pub fn matches(self, user: &UserAccount) -> bool {
        if user.is_admin {
            return false;
        }
        match self {
            UserFilter::Members => true,
            UserFilter::Active => user.is_active,
            UserFilter::Pending => !user.is_active,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the username or email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_user(&self, id: UserId) -> Result<UserAccount, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<UserAccount>, StorageError>;

    /// Email lookup is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError>;

    /// Persist the mutable account fields (activation, approval, last login).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the account no longer exists.
    async fn update_user(&self, user: &UserAccount) -> Result<(), StorageError>;

    /// Remove an account and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the account does not exist.
    async fn delete_user(&self, id: UserId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn count_users(&self, filter: UserFilter) -> Result<u64, StorageError>;

    /// Accounts matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn list_users(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<UserAccount>, StorageError>;
}

#[async_trait]
pub trait ChapterRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` on a duplicate (user, subject, name).
    async fn insert_chapters(&self, chapters: &[NewChapter]) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, StorageError>;

    /// All chapters for a user, by subject then syllabus order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn chapters_for_user(&self, user_id: UserId) -> Result<Vec<Chapter>, StorageError>;

    /// Persist flags, revision counter and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the chapter no longer exists.
    async fn update_chapter(&self, chapter: &Chapter) -> Result<(), StorageError>;

    /// Revised chapters whose last revision is strictly before `before`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn count_needing_revision(
        &self,
        user_id: UserId,
        before: DateTime<Utc>,
    ) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait RevisionRepository: Send + Sync {
    /// Persist the already-updated chapter and append its revision log atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the log does not belong to the chapter,
    /// `StorageError::NotFound` if the chapter is gone.
    async fn record_revision(
        &self,
        chapter: &Chapter,
        revision: NewRevision,
    ) -> Result<RevisionLog, StorageError>;

    /// Most recent revisions for a user with their chapter names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn recent_revisions(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<RevisionEntry>, StorageError>;
}

#[async_trait]
pub trait StudyLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be stored.
    async fn insert_log(&self, log: NewStudyLog) -> Result<StudyLog, StorageError>;

    /// Latest logs by study date, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn recent_logs(&self, user_id: UserId, limit: u32)
    -> Result<Vec<StudyLog>, StorageError>;

    /// Logs dated on or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn logs_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<StudyLog>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn totals(&self, user_id: UserId) -> Result<StudyTotals, StorageError>;

    /// Minutes logged on or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn minutes_since(&self, user_id: UserId, since: NaiveDate) -> Result<u64, StorageError>;

    /// Distinct study dates on or after `since`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn study_dates(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<NaiveDate>, StorageError>;
}

#[async_trait]
pub trait TestScoreRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the score cannot be stored.
    async fn insert_test(&self, test: NewTestScore) -> Result<TestScore, StorageError>;

    /// Tests by date, newest first. `None` returns all of them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn tests_for_user(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<TestScore>, StorageError>;
}

#[async_trait]
pub trait PomodoroRepository: Send + Sync {
    /// Add one completed interval to the (user, date) row, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the upsert fails.
    async fn record_completion(
        &self,
        completion: PomodoroCompletion,
    ) -> Result<PomodoroDay, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn day(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<PomodoroDay>, StorageError>;

    /// Days on or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn days_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<PomodoroDay>, StorageError>;
}

#[async_trait]
pub trait AdminLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_admin_log(&self, entry: NewAdminLog) -> Result<AdminLogEntry, StorageError>;

    /// Newest entries first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn recent_admin_logs(&self, limit: u32) -> Result<Vec<AdminLogEntry>, StorageError>;
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub chapters: Arc<dyn ChapterRepository>,
    pub revisions: Arc<dyn RevisionRepository>,
    pub study_logs: Arc<dyn StudyLogRepository>,
    pub tests: Arc<dyn TestScoreRepository>,
    pub pomodoro: Arc<dyn PomodoroRepository>,
    pub admin_logs: Arc<dyn AdminLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    pub(crate) fn from_repository<R>(repo: R) -> Self
    where
        R: UserRepository
            + ChapterRepository
            + RevisionRepository
            + StudyLogRepository
            + TestScoreRepository
            + PomodoroRepository
            + AdminLogRepository
            + Clone
            + 'static,
    {
        Self {
            users: Arc::new(repo.clone()),
            chapters: Arc::new(repo.clone()),
            revisions: Arc::new(repo.clone()),
            study_logs: Arc::new(repo.clone()),
            tests: Arc::new(repo.clone()),
            pomodoro: Arc::new(repo.clone()),
            admin_logs: Arc::new(repo),
        }
    }
}
