use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use services::{AdminBootstrap, AppServices, AuthService, Clock, ServiceSettings};
use storage::repository::Storage;
use tower::ServiceExt;
use tracker_core::model::{RegistrationDraft, Subject, UserAccount};
use tracker_core::time::fixed_now;
use web::{AppState, router};

struct Harness {
    app: Router,
    services: AppServices,
    admin: UserAccount,
}

async fn harness() -> Harness {
    harness_on(Storage::in_memory()).await
}

async fn harness_on(storage: Storage) -> Harness {
    let clock = Clock::fixed(fixed_now());
    let auth = AuthService::new(clock, Arc::clone(&storage.users), Arc::clone(&storage.chapters))
        .with_hash_iterations(1_000);
    let services = AppServices::with_auth(&storage, clock, ServiceSettings::default(), auth);
    let admin = services
        .auth()
        .ensure_admin(&AdminBootstrap {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "admin123".into(),
        })
        .await
        .expect("bootstrap admin");
    Harness {
        app: router(AppState::new(services.clone(), clock)),
        services,
        admin,
    }
}

impl Harness {
    async fn member(&self, username: &str, approve: bool) -> UserAccount {
        let user = self
            .services
            .auth()
            .register(RegistrationDraft {
                username: username.into(),
                email: format!("{username}@example.com"),
                full_name: None,
                target_exam_year: Some(2026),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            })
            .await
            .expect("register");
        if approve {
            self.services
                .admin()
                .approve(self.admin.id, user.id)
                .await
                .expect("approve")
        } else {
            user
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.expect("infallible")
    }

    async fn login(&self, path: &str, username: &str, password: &str) -> (Response, String) {
        self.login_with(path, username, password, "").await
    }

    /// Submit a login form with extra urlencoded fields appended.
    async fn login_with(
        &self,
        path: &str,
        username: &str,
        password: &str,
        extra: &str,
    ) -> (Response, String) {
        let response = self
            .send(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(format!(
                        "username={username}&password={password}{extra}"
                    )))
                    .expect("request"),
            )
            .await;
        let cookie = session_cookie(&response).unwrap_or_default();
        (response, cookie)
    }
}

fn set_cookie(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
}

fn session_cookie(response: &Response) -> Option<String> {
    set_cookie(response)
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

fn is_persistent(response: &Response) -> bool {
    set_cookie(response).is_some_and(|v| v.contains("Max-Age") || v.contains("Expires"))
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn get(path: &str, cookie: &str) -> Request<Body> {
    Request::get(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

fn post_json(path: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

async fn json(response: Response) -> Value {
    serde_json::from_str(&text(response).await).expect("json body")
}

#[tokio::test]
async fn unknown_routes_render_not_found_page() {
    let h = harness().await;
    let response = h.send(get("/no-such-page", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(text(response).await.contains("404"));
}

#[tokio::test]
async fn tracker_pages_require_login() {
    let h = harness().await;
    let response = h.send(get("/dashboard", "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fdashboard");

    let response = h.send(get("/admin/dashboard", "")).await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn pending_members_cannot_log_in() {
    let h = harness().await;
    h.member("ravi", false).await;
    let (response, _) = h.login("/login", "ravi", "secret1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn member_updates_chapters_through_json_endpoints() {
    let h = harness().await;
    let asha = h.member("asha", true).await;
    let other = h.member("ravi", true).await;

    let (response, cookie) = h.login("/login", "asha", "secret1").await;
    assert_eq!(location(&response), "/dashboard");
    assert!(!cookie.is_empty(), "login must set a session cookie");

    let page = h.send(get("/dashboard", &cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = text(page).await;
    assert!(html.contains("Welcome back, asha!"), "missing flash in {html}");

    let board = h.services.syllabus().board(asha.id).await.expect("board");
    let mine = board.subject(Subject::Physics).expect("physics").chapters[0].id();
    let response = h
        .send(post_json(
            &format!("/update_chapter/{mine}"),
            &cookie,
            r#"{"ncert_read": true}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["is_completed"], false);

    let theirs = h.services.syllabus().board(other.id).await.expect("board");
    let foreign = theirs.subject(Subject::Physics).expect("physics").chapters[0].id();
    let response = h
        .send(post_json(
            &format!("/update_chapter/{foreign}"),
            &cookie,
            r#"{"revised": true}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json(response).await["error"], "Unauthorized");

    let response = h
        .send(post_json("/update_chapter/999999", &cookie, "{}"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = h
        .send(post_json(
            &format!("/log_revision/{mine}"),
            &cookie,
            r#"{"confidence_level": 9}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pomodoro_completion_counts_today() {
    let h = harness().await;
    h.member("asha", true).await;
    let (_, cookie) = h.login("/login", "asha", "secret1").await;

    let started = json(h.send(post_json("/pomodoro/start", &cookie, "")).await).await;
    assert_eq!(started["message"], "Pomodoro started");

    let done = json(
        h.send(post_json(
            "/pomodoro/complete",
            &cookie,
            r#"{"subject": "Biology"}"#,
        ))
        .await,
    )
    .await;
    assert_eq!(done["sessions_today"], 1);
    assert_eq!(done["total_minutes"], 25);

    let stats = json(h.send(get("/pomodoro/stats?days=7", &cookie)).await).await;
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["dates"][0], "2023-11-14");
}

#[tokio::test]
async fn admin_pages_are_admin_only() {
    let h = harness().await;
    let ravi = h.member("ravi", false).await;
    h.member("asha", true).await;

    let (_, member_cookie) = h.login("/login", "asha", "secret1").await;
    let response = h.send(get("/admin/pending_users", &member_cookie)).await;
    assert_eq!(location(&response), "/dashboard");

    let (response, admin_cookie) = h.login("/admin/login", "admin", "admin123").await;
    assert_eq!(location(&response), "/admin/dashboard");

    let page = text(h.send(get("/admin/pending_users", &admin_cookie)).await).await;
    assert!(page.contains("ravi@example.com"), "missing pending user in {page}");

    let response = h
        .send(
            Request::post(format!("/admin/approve_user/{}", ravi.id))
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(location(&response), "/admin/pending_users");
    let approved = h.services.auth().user(ravi.id).await.expect("user");
    assert!(approved.is_active);

    let response = h
        .send(
            Request::post(format!("/admin/delete_user/{}", h.admin.id))
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(location(&response), "/admin/manage_users");
    let page = text(h.send(get("/admin/manage_users", &admin_cookie)).await).await;
    assert!(page.contains("Cannot delete admin accounts."), "missing flash in {page}");
}

#[tokio::test]
async fn remember_me_controls_cookie_lifetime() {
    let h = harness().await;
    h.member("asha", true).await;

    let (response, cookie) = h.login("/login", "asha", "secret1").await;
    assert!(!cookie.is_empty());
    assert!(!is_persistent(&response), "browser-session cookie expected");

    let (response, _) = h
        .login_with("/login", "asha", "secret1", "&remember_me=y")
        .await;
    assert_eq!(location(&response), "/dashboard");
    assert!(is_persistent(&response), "remembered login must outlive the browser");

    let (response, _) = h.login("/admin/login", "admin", "admin123").await;
    assert!(!is_persistent(&response));

    let (response, _) = h
        .login_with("/admin/login", "admin", "admin123", "&remember_me=y")
        .await;
    assert_eq!(location(&response), "/admin/dashboard");
    assert!(is_persistent(&response));
}

#[tokio::test]
async fn login_keeps_next_through_success_and_failure() {
    let h = harness().await;
    h.member("asha", true).await;

    let (response, _) = h
        .login_with("/login", "asha", "wrong", "&next=%2Fstudy_log")
        .await;
    assert_eq!(location(&response), "/login?next=%2Fstudy_log");

    let (response, _) = h
        .login_with("/login", "asha", "secret1", "&next=https%3A%2F%2Fevil.example")
        .await;
    assert_eq!(location(&response), "/dashboard");

    let (response, cookie) = h
        .login_with("/login", "asha", "secret1", "&next=%2Fstudy_log")
        .await;
    assert_eq!(location(&response), "/study_log");
    let page = h.send(get("/study_log", &cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn stats_accept_the_widest_day_window() {
    let h = harness().await;
    h.member("asha", true).await;
    let (_, cookie) = h.login("/login", "asha", "secret1").await;

    let response = h.send(get("/study_stats?days=4294967295", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["dates"], serde_json::json!([]));

    h.send(post_json("/pomodoro/complete", &cookie, "")).await;
    let response = h.send(get("/pomodoro/stats?days=4294967295", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["total_sessions"], 1);
}

#[tokio::test]
async fn sqlite_ids_beyond_range_are_not_found() {
    let storage = Storage::sqlite("sqlite:file:router_huge_ids?mode=memory&cache=shared")
        .await
        .expect("sqlite storage");
    let h = harness_on(storage).await;
    h.member("asha", true).await;

    let (_, cookie) = h.login("/login", "asha", "secret1").await;
    let response = h
        .send(post_json(
            &format!("/update_chapter/{}", u64::MAX),
            &cookie,
            r#"{"revised": true}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, admin_cookie) = h.login("/admin/login", "admin", "admin123").await;
    let response = h
        .send(get(&format!("/admin/view_user/{}", u64::MAX), &admin_cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
