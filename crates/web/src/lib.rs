#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod flash;
pub mod forms;
pub mod routes;
mod scripts;
pub mod state;
pub mod views;
pub mod vm;

use axum::Router;
use axum::routing::{get, post};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use error::{ApiError, WebError};
pub use state::AppState;

use routes::{admin, pomodoro, public, tracker};

/// Every page and JSON endpoint behind an in-memory session store.
///
/// Session cookies last for the browser session unless the user asks to be
/// remembered at login.
pub fn router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name("tracker_session")
        .with_secure(false)
        .with_expiry(Expiry::OnSessionEnd);

    Router::new()
        .route("/", get(public::index))
        .route("/register", get(public::register_form).post(public::register))
        .route("/login", get(public::login_form).post(public::login))
        .route("/logout", get(public::logout))
        .route("/dashboard", get(tracker::dashboard))
        .route("/update_chapter/{id}", post(tracker::update_chapter))
        .route("/study_log", get(tracker::study_log_form).post(tracker::study_log))
        .route("/study_stats", get(tracker::study_stats))
        .route("/test_tracker", get(tracker::test_tracker_form).post(tracker::test_tracker))
        .route("/test_stats", get(tracker::test_stats))
        .route("/revision", get(tracker::revision))
        .route("/log_revision/{id}", post(tracker::log_revision))
        .route("/pomodoro", get(pomodoro::page))
        .route("/pomodoro/start", post(pomodoro::start))
        .route("/pomodoro/complete", post(pomodoro::complete))
        .route("/pomodoro/stats", get(pomodoro::stats))
        .route("/admin/login", get(public::admin_login_form).post(public::admin_login))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/pending_users", get(admin::pending_users))
        .route("/admin/approve_user/{id}", post(admin::approve_user))
        .route("/admin/reject_user/{id}", post(admin::reject_user))
        .route("/admin/deactivate_user/{id}", post(admin::deactivate_user))
        .route("/admin/delete_user/{id}", post(admin::delete_user))
        .route("/admin/manage_users", get(admin::manage_users))
        .route("/admin/view_user/{id}", get(admin::view_user))
        .fallback(routes::not_found)
        .layer(sessions)
        .with_state(state)
}
