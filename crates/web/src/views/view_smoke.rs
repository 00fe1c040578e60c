use services::SyllabusBoard;
use tracker_core::model::{Chapter, ChapterUpdate, NewChapter, Subject, UserId};
use tracker_core::time::fixed_now;

use super::*;
use crate::flash::{Flash, FlashLevel};
use crate::forms::{LoginForm, StudyLogForm, TestScoreForm};
use crate::vm::{ChromeVm, NavVm, PagerVm, PomodoroSettingsVm, UserRowVm, map_board};

fn member_chrome() -> ChromeVm {
    ChromeVm {
        nav: Some(NavVm {
            display_name: "Asha Rao".into(),
            is_admin: false,
        }),
        flashes: Vec::new(),
    }
}

fn board() -> SyllabusBoard {
    let now = fixed_now();
    let mut done = Chapter::from_new(
        tracker_core::model::ChapterId::new(7),
        NewChapter::new(UserId::new(1), Subject::Physics, "Units and Measurements", 1, now)
            .expect("chapter"),
    );
    done.apply_update(
        ChapterUpdate {
            ncert_read: Some(true),
            lecture_watched: Some(true),
            questions_solved: Some(true),
            revised: Some(true),
        },
        now,
    );
    let open = Chapter::from_new(
        tracker_core::model::ChapterId::new(8),
        NewChapter::new(UserId::new(1), Subject::Biology, "The Living World", 1, now)
            .expect("chapter"),
    );
    SyllabusBoard::from_chapters(vec![done, open])
}

#[test]
fn landing_page_offers_registration_to_guests() {
    let html = landing_page(ChromeVm::default());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Create an account"), "missing call to action in {html}");
    assert!(html.contains("window.trackerToast"));
}

#[test]
fn flashes_render_once_with_their_level() {
    let chrome = ChromeVm::new(
        None,
        vec![Flash {
            level: FlashLevel::Warning,
            message: "Please log in to access this page.".into(),
        }],
    );
    let html = login_page(chrome, LoginForm::default(), Vec::new(), false);
    assert!(html.contains("flash flash-warning"), "missing flash in {html}");
    assert!(html.contains("Please log in to access this page."));
    assert!(html.contains("remember_me"));
}

#[test]
fn admin_login_offers_remember_me() {
    let html = login_page(ChromeVm::default(), LoginForm::default(), Vec::new(), true);
    assert!(html.contains("action=\"/admin/login\""), "wrong form target in {html}");
    assert!(html.contains("remember_me"));
}

#[test]
fn dashboard_renders_chapter_checkboxes_and_stats() {
    let vm = DashboardVm {
        greeting: "Asha Rao".into(),
        board: map_board(&board()),
        week_hours: "4.5".into(),
        streak: 3,
        needing_revision: 0,
        pomodoro_today: 2,
        recent_tests: Vec::new(),
    };
    let html = dashboard_page(member_chrome(), vm);
    assert!(html.contains("Units and Measurements"));
    assert!(html.contains("data-chapter=\"7\""), "missing checkbox data in {html}");
    assert!(html.contains("id=\"chapter-7\""));
    assert!(html.contains("50.0%"), "missing overall progress in {html}");
    assert!(html.contains("/update_chapter/"));
}

#[test]
fn study_log_form_keeps_entered_values() {
    let vm = StudyLogVm {
        form: StudyLogForm {
            date: "2023-11-14".into(),
            subject: "Chemistry".into(),
            duration_minutes: "0".into(),
            notes: String::new(),
        },
        errors: vec!["Duration must be between 1 and 1440 minutes".into()],
        logs: Vec::new(),
        total_hours: "0.0".into(),
        average_hours: "0.0".into(),
    };
    let html = study_log_page(member_chrome(), vm);
    assert!(html.contains("Duration must be between 1 and 1440 minutes"));
    assert!(html.contains("value=\"2023-11-14\""));
    assert!(html.contains("No study sessions logged yet."));
}

#[test]
fn test_tracker_lists_every_test_type() {
    let vm = TestTrackerVm {
        form: TestScoreForm::for_date(fixed_now().date_naive()),
        errors: Vec::new(),
        tests: Vec::new(),
    };
    let html = test_tracker_page(member_chrome(), vm);
    assert!(html.contains("Full Length Mock Test"));
    assert!(html.contains("Online Test Series"));
    assert!(html.contains("value=\"720\""), "missing default total in {html}");
}

#[test]
fn pomodoro_page_starts_at_work_length() {
    let vm = PomodoroVm {
        settings: PomodoroSettingsVm {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long_break: 4,
        },
        sessions_today: 1,
        week_sessions: 6,
        week_hours: "2.5".into(),
    };
    let html = pomodoro_page(member_chrome(), vm);
    assert!(html.contains("25:00"), "missing initial clock in {html}");
    assert!(html.contains("/pomodoro/complete"));
}

#[test]
fn manage_users_shows_pager_links() {
    let users = vec![UserRowVm {
        id: 4,
        username: "ravi".into(),
        email: "ravi@example.com".into(),
        full_name: String::new(),
        target_year: "-".into(),
        status: "Pending".into(),
        is_pending: true,
        joined_str: "14 Nov 2023 22:13".into(),
        last_login_str: "Never".into(),
    }];
    let pager = PagerVm {
        page: 2,
        pages: 3,
        total: 45,
        prev_href: Some("/admin/manage_users?page=1".into()),
        next_href: Some("/admin/manage_users?page=3".into()),
    };
    let html = manage_users_page(member_chrome(), users, pager);
    assert!(html.contains("Page 2 of 3"));
    assert!(html.contains("/admin/approve_user/4"));
    assert!(html.contains("/admin/delete_user/4"));
    assert!(html.contains("manage_users?page=3"));
}

#[test]
fn error_pages_render() {
    assert!(not_found_page().contains("404"));
    assert!(server_error_page().contains("500"));
}
