pub mod admin;
pub mod pomodoro;
pub mod public;
pub mod tracker;

use axum::response::{Html, IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;
use tracker_core::model::UserAccount;

use crate::error::WebError;
use crate::flash;
use crate::vm::ChromeVm;

/// `?days=N` on the stats endpoints.
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

pub(crate) async fn chrome(
    session: &Session,
    user: Option<&UserAccount>,
) -> Result<ChromeVm, WebError> {
    Ok(ChromeVm::new(user, flash::take(session).await?))
}

pub(crate) fn html(page: String) -> Response {
    Html(page).into_response()
}

pub(crate) fn iso_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

pub async fn not_found() -> WebError {
    WebError::NotFound
}
