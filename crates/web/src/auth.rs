//! Session-backed request guards.

use axum::extract::FromRequestParts;
use axum::http::Method;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use services::AuthError;
use storage::StorageError;
use tower_sessions::{Expiry, Session};
use tracker_core::model::{UserAccount, UserId};

use crate::error::WebError;
use crate::flash::{self, FlashLevel};
use crate::state::AppState;

const USER_KEY: &str = "user_id";
const REMEMBER_FOR_DAYS: i64 = 30;

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";
pub const PENDING_APPROVAL: &str =
    "Your account is pending admin approval. Please wait for activation.";
pub const ADMIN_REQUIRED: &str = "You do not have permission to access this page.";

/// Cookie lifetime for a login: 30 days of inactivity when remembered,
/// otherwise the browser session.
#[must_use]
pub fn login_expiry(remember: bool) -> Expiry {
    if remember {
        Expiry::OnInactivity(time::Duration::days(REMEMBER_FOR_DAYS))
    } else {
        Expiry::OnSessionEnd
    }
}

/// Record a successful login in the session.
///
/// # Errors
///
/// Returns the session store error on failure.
pub async fn log_in(
    session: &Session,
    user: &UserAccount,
    remember: bool,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.set_expiry(Some(login_expiry(remember)));
    session.insert(USER_KEY, user.id.value()).await
}

/// # Errors
///
/// Returns the session store error on failure.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.clear().await;
    session.cycle_id().await
}

/// `next` target honoured after login; only local paths are accepted.
#[must_use]
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}

/// Member login page, carrying `next` when it is a local path.
#[must_use]
pub fn login_url(next: Option<&str>) -> String {
    match safe_next(next) {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_owned(),
    }
}

/// The signed-in account, if any.
pub struct CurrentUser {
    pub session: Session,
    pub user: Option<UserAccount>,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let user = load_user(&session, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self { session, user })
    }
}

async fn load_user(session: &Session, state: &AppState) -> Result<Option<UserAccount>, WebError> {
    let Some(id) = session.get::<u64>(USER_KEY).await? else {
        return Ok(None);
    };
    match state.services().auth().user(UserId::new(id)).await {
        Ok(user) => Ok(Some(user)),
        Err(AuthError::Storage(StorageError::NotFound)) => {
            session.remove::<u64>(USER_KEY).await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// An account allowed to use the tracker pages: active members and admins.
pub struct Member {
    pub session: Session,
    pub user: UserAccount,
}

impl FromRequestParts<AppState> for Member {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { session, user } = CurrentUser::from_request_parts(parts, state).await?;
        let target = match user {
            Some(user) if user.can_track() => return Ok(Self { session, user }),
            Some(user) => {
                tracing::warn!(user_id = %user.id, "pending account refused");
                flash::redirect(&session, FlashLevel::Info, PENDING_APPROVAL, "/").await
            }
            None => {
                let next = (parts.method == Method::GET).then(|| parts.uri.path());
                let to = login_url(next);
                flash::redirect(&session, FlashLevel::Warning, LOGIN_REQUIRED, &to).await
            }
        };
        Err(target.into_response())
    }
}

/// An administrator.
pub struct Admin {
    pub session: Session,
    pub user: UserAccount,
}

impl FromRequestParts<AppState> for Admin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { session, user } = CurrentUser::from_request_parts(parts, state).await?;
        let target = match user {
            Some(user) if user.is_admin => return Ok(Self { session, user }),
            Some(user) => {
                tracing::warn!(user_id = %user.id, path = %parts.uri.path(), "admin page refused");
                flash::redirect(&session, FlashLevel::Danger, ADMIN_REQUIRED, "/dashboard").await
            }
            None => {
                flash::redirect(&session, FlashLevel::Warning, LOGIN_REQUIRED, "/admin/login")
                    .await
            }
        };
        Err(target.into_response())
    }
}

/// Where a signed-in account lands by default.
#[must_use]
pub fn home_for(user: &UserAccount) -> &'static str {
    if user.is_admin {
        "/admin/dashboard"
    } else {
        "/dashboard"
    }
}

/// Redirect away from a guest-only page.
pub(crate) fn already_signed_in(user: &UserAccount) -> Redirect {
    Redirect::to(home_for(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_next_targets_are_honoured() {
        assert_eq!(safe_next(Some("/study_log")), Some("/study_log"));
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn login_url_encodes_local_targets_only() {
        assert_eq!(login_url(Some("/study_log")), "/login?next=%2Fstudy_log");
        assert_eq!(
            login_url(Some("/admin/manage_users?page=2")),
            "/login?next=%2Fadmin%2Fmanage_users%3Fpage%3D2"
        );
        assert_eq!(login_url(Some("//evil.example")), "/login");
        assert_eq!(login_url(None), "/login");
    }
}
