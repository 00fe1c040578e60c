use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use services::{AuthError, LoginPortal};
use tower_sessions::Session;

use crate::auth::{self, CurrentUser, already_signed_in, home_for, login_url, safe_next};
use crate::error::WebError;
use crate::flash::{self, FlashLevel};
use crate::forms::{LoginForm, RegisterForm};
use crate::routes::{chrome, html};
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

pub async fn index(CurrentUser { session, user }: CurrentUser) -> Result<Response, WebError> {
    let chrome = chrome(&session, user.as_ref()).await?;
    Ok(html(views::landing_page(chrome)))
}

pub async fn register_form(
    CurrentUser { session, user }: CurrentUser,
) -> Result<Response, WebError> {
    if let Some(user) = &user {
        return Ok(already_signed_in(user).into_response());
    }
    let chrome = chrome(&session, None).await?;
    Ok(html(views::register_page(chrome, RegisterForm::default(), Vec::new())))
}

pub async fn register(
    State(state): State<AppState>,
    CurrentUser { session, user }: CurrentUser,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if let Some(user) = &user {
        return Ok(already_signed_in(user).into_response());
    }
    let outcome = match form.to_draft() {
        Ok(draft) => state.services().auth().register(draft).await,
        Err(message) => return rerender_register(&session, form, message).await,
    };
    match outcome {
        Ok(_) => Ok(flash::redirect(
            &session,
            FlashLevel::Success,
            "Registration successful! Your account is pending admin approval. You will be notified once approved.",
            "/login",
        )
        .await?
        .into_response()),
        Err(
            err @ (AuthError::Registration(_) | AuthError::UsernameTaken | AuthError::EmailTaken),
        ) => rerender_register(&session, form, err.to_string()).await,
        Err(err) => Err(err.into()),
    }
}

async fn rerender_register(
    session: &Session,
    form: RegisterForm,
    message: String,
) -> Result<Response, WebError> {
    let chrome = chrome(session, None).await?;
    let form = RegisterForm {
        password: String::new(),
        confirm_password: String::new(),
        ..form
    };
    Ok(html(views::register_page(chrome, form, vec![message])))
}

pub async fn login_form(
    CurrentUser { session, user }: CurrentUser,
    Query(query): Query<NextQuery>,
) -> Result<Response, WebError> {
    if let Some(user) = &user {
        return Ok(already_signed_in(user).into_response());
    }
    let chrome = chrome(&session, None).await?;
    let form = LoginForm {
        next: safe_next(query.next.as_deref()).map(str::to_owned),
        ..LoginForm::default()
    };
    Ok(html(views::login_page(chrome, form, Vec::new(), false)))
}

pub async fn login(
    State(state): State<AppState>,
    CurrentUser { session, user }: CurrentUser,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if let Some(user) = &user {
        return Ok(already_signed_in(user).into_response());
    }
    if let Err(message) = form.check() {
        let chrome = chrome(&session, None).await?;
        return Ok(html(views::login_page(chrome, form, vec![message], false)));
    }

    let user = match state
        .services()
        .auth()
        .authenticate(&form.username, &form.password, LoginPortal::User)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Ok(flash::redirect(
                &session,
                FlashLevel::Danger,
                "Invalid username or password.",
                &login_url(form.next.as_deref()),
            )
            .await?
            .into_response());
        }
        Err(AuthError::PendingApproval) => {
            return Ok(
                flash::redirect(
                    &session,
                    FlashLevel::Warning,
                    auth::PENDING_APPROVAL,
                    &login_url(form.next.as_deref()),
                )
                .await?
                .into_response(),
            );
        }
        Err(err) => return Err(err.into()),
    };

    auth::log_in(&session, &user, form.remember()).await?;
    let target = safe_next(form.next.as_deref()).unwrap_or_else(|| home_for(&user));
    Ok(flash::redirect(
        &session,
        FlashLevel::Success,
        format!("Welcome back, {}!", user.username),
        target,
    )
    .await?
    .into_response())
}

pub async fn logout(session: Session) -> Result<Redirect, WebError> {
    auth::log_out(&session).await?;
    flash::redirect(
        &session,
        FlashLevel::Info,
        "You have been logged out successfully.",
        "/",
    )
    .await
}

pub async fn admin_login_form(
    CurrentUser { session, user }: CurrentUser,
) -> Result<Response, WebError> {
    if user.as_ref().is_some_and(|u| u.is_admin) {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }
    let chrome = chrome(&session, user.as_ref()).await?;
    Ok(html(views::login_page(chrome, LoginForm::default(), Vec::new(), true)))
}

pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if let Err(message) = form.check() {
        let chrome = chrome(&session, None).await?;
        return Ok(html(views::login_page(chrome, form, vec![message], true)));
    }

    let redirect = match state
        .services()
        .auth()
        .authenticate(&form.username, &form.password, LoginPortal::Admin)
        .await
    {
        Ok(user) => {
            auth::log_in(&session, &user, form.remember()).await?;
            flash::redirect(
                &session,
                FlashLevel::Success,
                format!("Welcome, Admin {}!", user.username),
                "/admin/dashboard",
            )
            .await?
        }
        Err(AuthError::InvalidCredentials) => {
            flash::redirect(&session, FlashLevel::Danger, "Invalid credentials.", "/admin/login")
                .await?
        }
        Err(err @ AuthError::NotAdmin) => {
            flash::redirect(&session, FlashLevel::Danger, err.to_string(), "/login").await?
        }
        Err(err) => return Err(err.into()),
    };
    Ok(redirect.into_response())
}
