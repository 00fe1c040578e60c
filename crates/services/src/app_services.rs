use std::sync::Arc;

use storage::repository::Storage;
use tracker_core::model::PomodoroSettings;

use crate::Clock;
use crate::admin_service::AdminService;
use crate::auth_service::AuthService;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::pomodoro_service::PomodoroService;
use crate::study_log_service::StudyLogService;
use crate::syllabus_service::SyllabusService;
use crate::test_score_service::TestScoreService;

/// Tunables passed down from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub revision_reminder_days: u32,
    pub users_per_page: u32,
    pub pomodoro: PomodoroSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            revision_reminder_days: 7,
            users_per_page: 20,
            pomodoro: PomodoroSettings::default(),
        }
    }
}

/// Composition root wiring every service to one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    syllabus: Arc<SyllabusService>,
    study_logs: Arc<StudyLogService>,
    tests: Arc<TestScoreService>,
    pomodoro: Arc<PomodoroService>,
    dashboard: Arc<DashboardService>,
    admin: Arc<AdminService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, settings: ServiceSettings) -> Self {
        Self::with_auth(
            storage,
            clock,
            settings,
            AuthService::new(
                clock,
                Arc::clone(&storage.users),
                Arc::clone(&storage.chapters),
            ),
        )
    }

    /// Like [`AppServices::new`] with a caller-built `AuthService`, e.g. a
    /// cheaper hash work factor in tests.
    #[must_use]
    pub fn with_auth(
        storage: &Storage,
        clock: Clock,
        settings: ServiceSettings,
        auth: AuthService,
    ) -> Self {
        let syllabus = Arc::new(SyllabusService::new(
            clock,
            Arc::clone(&storage.chapters),
            Arc::clone(&storage.revisions),
            settings.revision_reminder_days,
        ));
        let study_logs = Arc::new(StudyLogService::new(clock, Arc::clone(&storage.study_logs)));
        let tests = Arc::new(TestScoreService::new(clock, Arc::clone(&storage.tests)));
        let pomodoro = Arc::new(PomodoroService::new(
            clock,
            Arc::clone(&storage.pomodoro),
            settings.pomodoro,
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&syllabus),
            Arc::clone(&study_logs),
            Arc::clone(&tests),
            Arc::clone(&pomodoro),
        ));
        let admin = Arc::new(AdminService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.admin_logs),
            Arc::clone(&dashboard),
            settings.users_per_page,
        ));

        Self {
            auth: Arc::new(auth),
            syllabus,
            study_logs,
            tests,
            pomodoro,
            dashboard,
            admin,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ServiceSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock, settings))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, settings: ServiceSettings) -> Self {
        Self::new(&Storage::in_memory(), clock, settings)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn syllabus(&self) -> Arc<SyllabusService> {
        Arc::clone(&self.syllabus)
    }

    #[must_use]
    pub fn study_logs(&self) -> Arc<StudyLogService> {
        Arc::clone(&self.study_logs)
    }

    #[must_use]
    pub fn tests(&self) -> Arc<TestScoreService> {
        Arc::clone(&self.tests)
    }

    #[must_use]
    pub fn pomodoro(&self) -> Arc<PomodoroService> {
        Arc::clone(&self.pomodoro)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}
