use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use services::{
    AdminError, AuthError, DashboardError, PomodoroError, StudyLogServiceError, SyllabusError,
    TestScoreServiceError,
};
use storage::StorageError;
use thiserror::Error;

use crate::views;

/// Failures of HTML page handlers.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
    #[error("{0}")]
    Internal(String),
}

macro_rules! internal_from {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for WebError {
                fn from(err: $err) -> Self {
                    Self::Internal(err.to_string())
                }
            }
        )+
    };
}

internal_from!(
    AuthError,
    DashboardError,
    StudyLogServiceError,
    TestScoreServiceError,
    PomodoroError,
);

impl From<SyllabusError> for WebError {
    fn from(err: SyllabusError) -> Self {
        match err {
            SyllabusError::ChapterNotFound | SyllabusError::Storage(StorageError::NotFound) => {
                Self::NotFound
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AdminError> for WebError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::UserNotFound => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

/// Failures of JSON endpoints, rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl From<SyllabusError> for ApiError {
    fn from(err: SyllabusError) -> Self {
        match err {
            SyllabusError::ChapterNotFound => Self::NotFound,
            SyllabusError::Forbidden => Self::Forbidden,
            SyllabusError::Revision(e) => Self::Validation(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<StudyLogServiceError> for ApiError {
    fn from(err: StudyLogServiceError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TestScoreServiceError> for ApiError {
    fn from(err: TestScoreServiceError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<PomodoroError> for ApiError {
    fn from(err: PomodoroError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(message) => {
                tracing::error!(error = %message, "api request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_chapters_map_to_forbidden() {
        let err = ApiError::from(SyllabusError::Forbidden);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_users_render_not_found_pages() {
        let response = WebError::from(AdminError::UserNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
