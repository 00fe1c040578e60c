mod admin;
mod dashboard;
mod layout;
mod pomodoro;
mod public;
mod records;
mod revision;

#[cfg(test)]
mod view_smoke;

pub use admin::{
    AdminDashboardVm, UserProgressVm, admin_dashboard_page, manage_users_page,
    pending_users_page, view_user_page,
};
pub use dashboard::{DashboardVm, dashboard_page};
pub use layout::{document, not_found_page, server_error_page};
pub use pomodoro::{PomodoroVm, pomodoro_page};
pub use public::{landing_page, login_page, register_page};
pub use records::{StudyLogVm, TestTrackerVm, study_log_page, test_tracker_page};
pub use revision::{RevisionVm, revision_page};
