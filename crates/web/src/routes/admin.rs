use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use services::AdminError;
use tower_sessions::Session;
use tracker_core::model::UserId;

use crate::auth::Admin;
use crate::error::WebError;
use crate::flash::{self, FlashLevel};
use crate::routes::{chrome, html};
use crate::state::AppState;
use crate::views::{self, AdminDashboardVm, UserProgressVm};
use crate::vm::{
    UserRowVm, map_admin_logs, map_board, map_study_logs, map_tests, map_user_rows, pager_from,
};

const PENDING: &str = "/admin/pending_users";
const MANAGE: &str = "/admin/manage_users";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
) -> Result<Response, WebError> {
    let overview = state.services().admin().overview().await?;
    let vm = AdminDashboardVm {
        total_users: overview.total_users,
        active_users: overview.active_users,
        pending_users: overview.pending_users,
        recent_users: map_user_rows(&overview.recent_users),
        recent_actions: map_admin_logs(&overview.recent_actions),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::admin_dashboard_page(chrome, vm)))
}

pub async fn pending_users(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
) -> Result<Response, WebError> {
    let pending = state.services().admin().pending().await?;
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::pending_users_page(chrome, map_user_rows(&pending))))
}

/// Turn a refused action on an admin account into a flash; anything else
/// propagates.
async fn protected(
    session: &Session,
    err: AdminError,
    message: &str,
    back_to: &str,
) -> Result<Redirect, WebError> {
    match err {
        AdminError::ProtectedAccount => {
            flash::redirect(session, FlashLevel::Danger, message, back_to).await
        }
        other => Err(other.into()),
    }
}

pub async fn approve_user(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Path(id): Path<u64>,
) -> Result<Redirect, WebError> {
    match state.services().admin().approve(user.id, UserId::new(id)).await {
        Ok(approved) => {
            flash::redirect(
                &session,
                FlashLevel::Success,
                format!("User {} has been approved and can now log in.", approved.username),
                PENDING,
            )
            .await
        }
        Err(err) => protected(&session, err, "Cannot modify admin accounts.", PENDING).await,
    }
}

pub async fn reject_user(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Path(id): Path<u64>,
) -> Result<Redirect, WebError> {
    match state.services().admin().reject(user.id, UserId::new(id)).await {
        Ok(username) => {
            flash::redirect(
                &session,
                FlashLevel::Info,
                format!("User {username} has been rejected and removed from the system."),
                PENDING,
            )
            .await
        }
        Err(err) => protected(&session, err, "Cannot delete admin accounts.", PENDING).await,
    }
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Path(id): Path<u64>,
) -> Result<Redirect, WebError> {
    match state.services().admin().deactivate(user.id, UserId::new(id)).await {
        Ok(target) => {
            flash::redirect(
                &session,
                FlashLevel::Success,
                format!("User {} has been deactivated.", target.username),
                MANAGE,
            )
            .await
        }
        Err(err) => protected(&session, err, "Cannot deactivate admin accounts.", MANAGE).await,
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Path(id): Path<u64>,
) -> Result<Redirect, WebError> {
    match state.services().admin().delete(user.id, UserId::new(id)).await {
        Ok(username) => {
            flash::redirect(
                &session,
                FlashLevel::Warning,
                format!("User {username} has been permanently deleted."),
                MANAGE,
            )
            .await
        }
        Err(err) => protected(&session, err, "Cannot delete admin accounts.", MANAGE).await,
    }
}

pub async fn manage_users(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Query(query): Query<PageQuery>,
) -> Result<Response, WebError> {
    let page = state
        .services()
        .admin()
        .manage(query.page.unwrap_or(1))
        .await?;
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::manage_users_page(
        chrome,
        map_user_rows(&page.users),
        pager_from(&page),
    )))
}

pub async fn view_user(
    State(state): State<AppState>,
    Admin { session, user }: Admin,
    Path(id): Path<u64>,
) -> Result<Response, WebError> {
    let (target, progress) = match state.services().admin().view_user(user.id, UserId::new(id)).await {
        Ok(found) => found,
        Err(AdminError::ProtectedAccount) => {
            let redirect = flash::redirect(
                &session,
                FlashLevel::Warning,
                "Cannot view admin user progress.",
                MANAGE,
            )
            .await?;
            return Ok(redirect.into_response());
        }
        Err(err) => return Err(err.into()),
    };
    let vm = UserProgressVm {
        user: UserRowVm::from(&target),
        board: map_board(&progress.board),
        recent_tests: map_tests(&progress.recent_tests),
        recent_logs: map_study_logs(&progress.recent_logs),
    };
    let chrome = chrome(&session, Some(&user)).await?;
    Ok(html(views::view_user_page(chrome, vm)))
}
