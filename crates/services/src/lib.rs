#![forbid(unsafe_code)]

pub mod admin_service;
pub mod app_services;
pub mod auth_service;
pub mod dashboard_service;
pub mod error;
pub mod password;
pub mod pomodoro_service;
pub mod study_log_service;
pub mod syllabus_service;
pub mod test_score_service;

pub use tracker_core::Clock;

pub use admin_service::{AdminOverview, AdminService, UserPage};
pub use app_services::{AppServices, ServiceSettings};
pub use auth_service::{AdminBootstrap, AuthService, LoginPortal};
pub use dashboard_service::{DashboardService, DashboardSnapshot, UserProgress};
pub use error::{
    AdminError, AppServicesError, AuthError, DashboardError, PomodoroError, StudyLogServiceError,
    SyllabusError, TestScoreServiceError,
};
pub use pomodoro_service::{PomodoroService, PomodoroStats};
pub use study_log_service::{StudyLogService, StudyOverview, StudySeries};
pub use syllabus_service::{
    ChapterStatus, RevisionOverview, RevisionReceipt, SubjectBoard, SyllabusBoard,
    SyllabusService,
};
pub use test_score_service::{TestScoreService, TestSeries};
