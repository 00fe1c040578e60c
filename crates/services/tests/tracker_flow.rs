use chrono::Duration;

use services::{
    AdminBootstrap, AdminError, AppServices, AuthError, AuthService, Clock, LoginPortal,
    ServiceSettings,
};
use storage::repository::Storage;
use tracker_core::model::{
    ChapterUpdate, RegistrationDraft, RevisionDraft, StudyLogDraft, Subject, SubjectMarks,
    TestScoreDraft, TestType,
};
use tracker_core::syllabus;
use tracker_core::time::fixed_now;

fn draft(username: &str) -> RegistrationDraft {
    RegistrationDraft {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: Some("Asha Rao".to_string()),
        target_exam_year: Some(2026),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
    }
}

async fn services(url: &str) -> AppServices {
    let storage = Storage::sqlite(url).await.expect("connect sqlite");
    let clock = Clock::fixed(fixed_now());
    let auth = AuthService::new(
        clock,
        std::sync::Arc::clone(&storage.users),
        std::sync::Arc::clone(&storage.chapters),
    )
    .with_hash_iterations(1_000);
    AppServices::with_auth(&storage, clock, ServiceSettings::default(), auth)
}

#[tokio::test]
async fn member_signs_up_gets_approved_and_tracks_progress() {
    let app = services("sqlite:file:memdb_tracker_flow?mode=memory&cache=shared").await;
    let admin = app
        .auth()
        .ensure_admin(&AdminBootstrap {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "admin123".into(),
        })
        .await
        .expect("bootstrap admin");

    let member = app.auth().register(draft("asha")).await.expect("register");
    assert!(member.is_pending());

    let refused = app
        .auth()
        .authenticate("asha", "secret1", LoginPortal::User)
        .await;
    assert!(matches!(refused, Err(AuthError::PendingApproval)));

    let pending = app.admin().pending().await.expect("pending");
    assert_eq!(pending.len(), 1);
    app.admin()
        .approve(admin.id, member.id)
        .await
        .expect("approve");

    let member = app
        .auth()
        .authenticate("asha", "secret1", LoginPortal::User)
        .await
        .expect("login after approval");
    assert!(member.last_login.is_some());

    let board = app.syllabus().board(member.id).await.expect("board");
    assert_eq!(
        board.overall.total as usize,
        syllabus::total_chapters(),
        "every syllabus chapter is seeded"
    );
    let first = board
        .subject(Subject::Physics)
        .expect("physics")
        .chapters[0]
        .id();

    let status = app
        .syllabus()
        .update_chapter(
            member.id,
            first,
            ChapterUpdate {
                ncert_read: Some(true),
                lecture_watched: Some(true),
                questions_solved: Some(true),
                revised: Some(true),
            },
        )
        .await
        .expect("update chapter");
    assert!(status.is_completed);

    let receipt = app
        .syllabus()
        .log_revision(
            member.id,
            first,
            RevisionDraft {
                confidence_level: Some(4),
                notes: Some("formulas".into()),
            },
        )
        .await
        .expect("log revision");
    assert_eq!(receipt.revision_count, 1);

    let today = fixed_now().date_naive();
    for offset in 0..3 {
        app.study_logs()
            .log_session(
                member.id,
                StudyLogDraft {
                    date: today - Duration::days(offset),
                    subject: Some(Subject::Physics),
                    duration_minutes: 90,
                    notes: None,
                },
            )
            .await
            .expect("log study");
    }

    app.tests()
        .record(
            member.id,
            TestScoreDraft {
                name: "Mock 1".into(),
                date: today,
                test_type: TestType::FullLength,
                physics: SubjectMarks::new(Some(120), Some(180)),
                chemistry: SubjectMarks::new(Some(150), Some(180)),
                biology: SubjectMarks::new(Some(300), Some(360)),
                total_score: 570,
                total_marks: 720,
                notes: None,
            },
        )
        .await
        .expect("record test");

    app.pomodoro()
        .complete(member.id, Some(Subject::Biology))
        .await
        .expect("pomodoro");

    let snapshot = app.dashboard().dashboard(member.id).await.expect("dashboard");
    assert_eq!(snapshot.board.overall.completed, 1);
    assert_eq!(snapshot.streak, 3);
    assert!((snapshot.week_hours - 4.5).abs() < f64::EPSILON);
    assert_eq!(snapshot.recent_tests.len(), 1);
    assert_eq!(snapshot.pomodoro_today, 1);

    let overview = app.admin().overview().await.expect("overview");
    assert_eq!(overview.total_users, 1);
    assert_eq!(overview.active_users, 1);
    assert_eq!(overview.pending_users, 0);
    assert_eq!(overview.recent_actions.len(), 1);
}

#[tokio::test]
async fn admin_accounts_are_protected_and_rejections_remove_data() {
    let app = services("sqlite:file:memdb_tracker_admin?mode=memory&cache=shared").await;
    let admin = app
        .auth()
        .ensure_admin(&AdminBootstrap {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "admin123".into(),
        })
        .await
        .expect("bootstrap admin");

    let protected = app.admin().deactivate(admin.id, admin.id).await;
    assert!(matches!(protected, Err(AdminError::ProtectedAccount)));

    let viewing = app.admin().view_user(admin.id, admin.id).await;
    assert!(matches!(viewing, Err(AdminError::ProtectedAccount)));

    let member = app.auth().register(draft("ravi")).await.expect("register");
    let name = app
        .admin()
        .reject(admin.id, member.id)
        .await
        .expect("reject");
    assert_eq!(name, "ravi");

    let gone = app.admin().approve(admin.id, member.id).await;
    assert!(matches!(gone, Err(AdminError::UserNotFound)));

    let page = app.admin().manage(1).await.expect("manage");
    assert_eq!(page.total, 0);
    assert!(page.users.is_empty());

    let overview = app.admin().overview().await.expect("overview");
    let last = &overview.recent_actions[0];
    assert_eq!(last.description, "Rejected and deleted user: ravi");
    assert!(last.target_user_id.is_none());
}
