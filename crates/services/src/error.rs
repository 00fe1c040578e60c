//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tracker_core::model::{
    RegistrationError, RevisionError, StudyLogError, TestScoreError,
};

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("Username already exists. Please choose a different one.")]
    UsernameTaken,
    #[error("Email already registered. Please use a different one.")]
    EmailTaken,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Your account is pending admin approval. Please wait for activation.")]
    PendingApproval,
    #[error("Access denied. Admin privileges required.")]
    NotAdmin,
    #[error("syllabus data is malformed: {0}")]
    Syllabus(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SyllabusService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyllabusError {
    #[error("chapter not found")]
    ChapterNotFound,
    #[error("Unauthorized")]
    Forbidden,
    #[error(transparent)]
    Revision(#[from] RevisionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StudyLogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyLogServiceError {
    #[error(transparent)]
    Validation(#[from] StudyLogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TestScoreService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestScoreServiceError {
    #[error(transparent)]
    Validation(#[from] TestScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PomodoroService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PomodoroError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Syllabus(#[from] SyllabusError),
    #[error(transparent)]
    StudyLog(#[from] StudyLogServiceError),
    #[error(transparent)]
    TestScore(#[from] TestScoreServiceError),
    #[error(transparent)]
    Pomodoro(#[from] PomodoroError),
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("user not found")]
    UserNotFound,
    #[error("Cannot modify admin accounts.")]
    ProtectedAccount,
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
