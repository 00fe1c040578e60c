use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde_json::{Value, json};
use services::{StudyLogServiceError, TestScoreServiceError};
use tracker_core::model::{ChapterId, ChapterUpdate, RevisionDraft};

use crate::auth::Member;
use crate::error::{ApiError, WebError};
use crate::flash::{self, FlashLevel};
use crate::forms::{StudyLogForm, TestScoreForm};
use crate::routes::{DaysQuery, chrome, html, iso_dates};
use crate::state::AppState;
use crate::views::{self, DashboardVm, RevisionVm, StudyLogVm, TestTrackerVm};
use crate::vm::{
    format_hours, map_board, map_chapters, map_revision_entries, map_study_logs, map_tests,
};

const DEFAULT_STUDY_DAYS: u32 = 30;

pub async fn dashboard(
    State(state): State<AppState>,
    Member { session, user }: Member,
) -> Result<Response, WebError> {
    let snapshot = state.services().dashboard().dashboard(user.id).await?;
    let vm = DashboardVm {
        greeting: user.display_name().to_owned(),
        board: map_board(&snapshot.board),
        week_hours: format_hours(snapshot.week_hours),
        streak: snapshot.streak,
        needing_revision: snapshot.needing_revision,
        pomodoro_today: snapshot.pomodoro_today,
        recent_tests: map_tests(&snapshot.recent_tests),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::dashboard_page(chrome, vm)))
}

pub async fn update_chapter(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    Path(id): Path<u64>,
    Json(update): Json<ChapterUpdate>,
) -> Result<Json<Value>, ApiError> {
    let status = state
        .services()
        .syllabus()
        .update_chapter(user.id, ChapterId::new(id), update)
        .await?;
    Ok(Json(json!({
        "success": true,
        "is_completed": status.is_completed,
        "revision_count": status.revision_count,
    })))
}

pub async fn study_log_form(
    State(state): State<AppState>,
    member: Member,
) -> Result<Response, WebError> {
    let form = StudyLogForm::for_date(state.today());
    render_study_log(&state, member, form, Vec::new()).await
}

pub async fn study_log(
    State(state): State<AppState>,
    member: Member,
    Form(form): Form<StudyLogForm>,
) -> Result<Response, WebError> {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(message) => return render_study_log(&state, member, form, vec![message]).await,
    };
    match state
        .services()
        .study_logs()
        .log_session(member.user.id, draft)
        .await
    {
        Ok(log) => Ok(flash::redirect(
            &member.session,
            FlashLevel::Success,
            format!(
                "Study session logged: {} minutes on {}",
                log.duration_minutes,
                log.date.format("%Y-%m-%d")
            ),
            "/study_log",
        )
        .await?
        .into_response()),
        Err(StudyLogServiceError::Validation(err)) => {
            render_study_log(&state, member, form, vec![err.to_string()]).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn render_study_log(
    state: &AppState,
    Member { session, user }: Member,
    form: StudyLogForm,
    errors: Vec<String>,
) -> Result<Response, WebError> {
    let overview = state.services().study_logs().overview(user.id).await?;
    let vm = StudyLogVm {
        form,
        errors,
        logs: map_study_logs(&overview.recent),
        total_hours: format_hours(overview.total_hours()),
        average_hours: format_hours(overview.average_hours()),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::study_log_page(chrome, vm)))
}

pub async fn study_stats(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Value>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_STUDY_DAYS);
    let series = state.services().study_logs().series(user.id, days).await?;
    Ok(Json(json!({
        "dates": iso_dates(&series.dates),
        "durations": series.durations,
    })))
}

pub async fn test_tracker_form(
    State(state): State<AppState>,
    member: Member,
) -> Result<Response, WebError> {
    let form = TestScoreForm::for_date(state.today());
    render_test_tracker(&state, member, form, Vec::new()).await
}

pub async fn test_tracker(
    State(state): State<AppState>,
    member: Member,
    Form(form): Form<TestScoreForm>,
) -> Result<Response, WebError> {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(message) => return render_test_tracker(&state, member, form, vec![message]).await,
    };
    match state.services().tests().record(member.user.id, draft).await {
        Ok(test) => Ok(flash::redirect(
            &member.session,
            FlashLevel::Success,
            format!("Test score saved: {} - {}%", test.name, test.percentage),
            "/test_tracker",
        )
        .await?
        .into_response()),
        Err(TestScoreServiceError::Validation(err)) => {
            render_test_tracker(&state, member, form, vec![err.to_string()]).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn render_test_tracker(
    state: &AppState,
    Member { session, user }: Member,
    form: TestScoreForm,
    errors: Vec<String>,
) -> Result<Response, WebError> {
    let tests = state.services().tests().list(user.id).await?;
    let vm = TestTrackerVm {
        form,
        errors,
        tests: map_tests(&tests),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::test_tracker_page(chrome, vm)))
}

pub async fn test_stats(
    State(state): State<AppState>,
    Member { user, .. }: Member,
) -> Result<Json<Value>, ApiError> {
    let series = state.services().tests().series(user.id).await?;
    Ok(Json(json!({
        "dates": iso_dates(&series.dates),
        "percentages": series.percentages,
        "physics_scores": series.physics,
        "chemistry_scores": series.chemistry,
        "biology_scores": series.biology,
    })))
}

pub async fn revision(
    State(state): State<AppState>,
    Member { session, user }: Member,
) -> Result<Response, WebError> {
    let syllabus = state.services().syllabus();
    let overview = syllabus.revision_overview(user.id).await?;
    let vm = RevisionVm {
        reminder_days: syllabus.reminder_days(),
        chapters: map_chapters(&overview.chapters),
        needing_revision: map_chapters(&overview.needing_revision),
        recent: map_revision_entries(&overview.recent),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::revision_page(chrome, vm)))
}

pub async fn log_revision(
    State(state): State<AppState>,
    Member { user, .. }: Member,
    Path(id): Path<u64>,
    Json(draft): Json<RevisionDraft>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state
        .services()
        .syllabus()
        .log_revision(user.id, ChapterId::new(id), draft)
        .await?;
    Ok(Json(json!({
        "success": true,
        "revision_count": receipt.revision_count,
        "last_revised": receipt.last_revised.format("%Y-%m-%d").to_string(),
    })))
}
