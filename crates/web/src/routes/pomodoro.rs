use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::{Value, json};
use tracker_core::model::Subject;

use crate::auth::Member;
use crate::error::{ApiError, WebError};
use crate::routes::{DaysQuery, chrome, html, iso_dates};
use crate::state::AppState;
use crate::views::{self, PomodoroVm};
use crate::vm::format_hours;

const DEFAULT_STATS_DAYS: u32 = 7;

/// Optional JSON body of the start and complete calls.
#[derive(Debug, Default, Deserialize)]
struct PomodoroBody {
    #[serde(default)]
    subject: Option<String>,
}

fn subject_from(body: &Bytes) -> Result<Option<Subject>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let parsed: PomodoroBody = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))?;
    match parsed.subject.as_deref() {
        Some(raw) => Subject::parse_optional(raw).map_err(|e| ApiError::Validation(e.to_string())),
        None => Ok(None),
    }
}

pub async fn page(
    State(state): State<AppState>,
    Member { session, user }: Member,
) -> Result<Response, WebError> {
    let pomodoro = state.services().pomodoro();
    let today = pomodoro.today_count(user.id).await?;
    let week = pomodoro.stats(user.id, DEFAULT_STATS_DAYS).await?;
    let vm = PomodoroVm {
        settings: pomodoro.settings().into(),
        sessions_today: today,
        week_sessions: week.total_sessions,
        week_hours: format_hours(week.total_hours),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::pomodoro_page(chrome, vm)))
}

pub async fn start(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let subject = subject_from(&body)?;
    let message = state.services().pomodoro().start(user.id, subject);
    Ok(Json(json!({ "success": true, "message": message })))
}

pub async fn complete(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let subject = subject_from(&body)?;
    let day = state.services().pomodoro().complete(user.id, subject).await?;
    Ok(Json(json!({
        "success": true,
        "sessions_today": day.sessions_completed,
        "total_minutes": day.total_focus_minutes,
    })))
}

pub async fn stats(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Value>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    let stats = state.services().pomodoro().stats(user.id, days).await?;
    Ok(Json(json!({
        "dates": iso_dates(&stats.dates),
        "sessions": stats.sessions,
        "total_sessions": stats.total_sessions,
        "total_hours": stats.total_hours,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_null_bodies_mean_no_subject() {
        assert_eq!(subject_from(&Bytes::new()).expect("empty"), None);
        assert_eq!(
            subject_from(&Bytes::from_static(b"{\"subject\": null}")).expect("null"),
            None
        );
        assert_eq!(
            subject_from(&Bytes::from_static(b"{\"subject\": \"Biology\"}")).expect("subject"),
            Some(Subject::Biology)
        );
    }

    #[test]
    fn unknown_subjects_are_rejected() {
        let err = subject_from(&Bytes::from_static(b"{\"subject\": \"Maths\"}"));
        assert!(matches!(err, Err(ApiError::Validation(_))));
    }
}
