use std::sync::Arc;

use tracker_core::model::{StudyLog, TestScore, UserId};

use crate::error::DashboardError;
use crate::pomodoro_service::PomodoroService;
use crate::study_log_service::StudyLogService;
use crate::syllabus_service::{SyllabusBoard, SyllabusService};
use crate::test_score_service::TestScoreService;

const RECENT_TESTS: u32 = 5;
const ADMIN_RECENT_LOGS: u32 = 10;
const WEEK_DAYS: u32 = 7;

/// Everything shown on a member's dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub board: SyllabusBoard,
    pub week_hours: f64,
    pub streak: u32,
    pub recent_tests: Vec<TestScore>,
    pub needing_revision: u64,
    pub pomodoro_today: u32,
}

/// Read-only progress view used by administrators.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProgress {
    pub board: SyllabusBoard,
    pub recent_tests: Vec<TestScore>,
    pub recent_logs: Vec<StudyLog>,
}

#[derive(Clone)]
pub struct DashboardService {
    syllabus: Arc<SyllabusService>,
    study: Arc<StudyLogService>,
    tests: Arc<TestScoreService>,
    pomodoro: Arc<PomodoroService>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        syllabus: Arc<SyllabusService>,
        study: Arc<StudyLogService>,
        tests: Arc<TestScoreService>,
        pomodoro: Arc<PomodoroService>,
    ) -> Self {
        Self {
            syllabus,
            study,
            tests,
            pomodoro,
        }
    }

    /// # Errors
    ///
    /// Returns `DashboardError` if any underlying query fails.
    pub async fn dashboard(&self, user: UserId) -> Result<DashboardSnapshot, DashboardError> {
        Ok(DashboardSnapshot {
            board: self.syllabus.board(user).await?,
            week_hours: self.study.hours_since(user, WEEK_DAYS).await?,
            streak: self.study.streak(user).await?,
            recent_tests: self.tests.recent(user, RECENT_TESTS).await?,
            needing_revision: self.syllabus.chapters_needing_revision(user).await?,
            pomodoro_today: self.pomodoro.today_count(user).await?,
        })
    }

    /// # Errors
    ///
    /// Returns `DashboardError` if any underlying query fails.
    pub async fn user_progress(&self, user: UserId) -> Result<UserProgress, DashboardError> {
        Ok(UserProgress {
            board: self.syllabus.board(user).await?,
            recent_tests: self.tests.recent(user, RECENT_TESTS).await?,
            recent_logs: self.study.recent(user, ADMIN_RECENT_LOGS).await?,
        })
    }
}
