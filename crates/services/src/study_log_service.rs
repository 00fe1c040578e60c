use std::sync::Arc;

use chrono::NaiveDate;
use storage::repository::StudyLogRepository;
use tracker_core::model::{
    MAX_STREAK_DAYS, StudyLog, StudyLogDraft, StudyTotals, UserId, minutes_to_hours,
    study_streak,
};
use tracker_core::time::days_before;

use crate::Clock;
use crate::error::StudyLogServiceError;

/// Logs listed on the study log page.
pub const RECENT_LOGS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct StudyOverview {
    pub recent: Vec<StudyLog>,
    pub totals: StudyTotals,
}

impl StudyOverview {
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.totals.total_hours()
    }

    #[must_use]
    pub fn average_hours(&self) -> f64 {
        self.totals.average_hours()
    }
}

/// Chart data: one point per log, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudySeries {
    pub dates: Vec<NaiveDate>,
    pub durations: Vec<u32>,
}

#[derive(Clone)]
pub struct StudyLogService {
    clock: Clock,
    logs: Arc<dyn StudyLogRepository>,
}

impl StudyLogService {
    #[must_use]
    pub fn new(clock: Clock, logs: Arc<dyn StudyLogRepository>) -> Self {
        Self { clock, logs }
    }

    /// # Errors
    ///
    /// Returns `Validation` for out-of-range input or `Storage` on failure.
    pub async fn log_session(
        &self,
        user: UserId,
        draft: StudyLogDraft,
    ) -> Result<StudyLog, StudyLogServiceError> {
        let new = draft.validate(user, self.clock.now())?;
        let log = self.logs.insert_log(new).await?;
        tracing::info!(
            user_id = %user,
            minutes = log.duration_minutes,
            date = %log.date,
            "study session logged"
        );
        Ok(log)
    }

    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn overview(&self, user: UserId) -> Result<StudyOverview, StudyLogServiceError> {
        let recent = self.logs.recent_logs(user, RECENT_LOGS).await?;
        let totals = self.logs.totals(user).await?;
        Ok(StudyOverview { recent, totals })
    }

    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn recent(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<StudyLog>, StudyLogServiceError> {
        Ok(self.logs.recent_logs(user, limit).await?)
    }

    /// Logs dated within the last `days` days (inclusive of the start day).
    ///
    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn series(&self, user: UserId, days: u32) -> Result<StudySeries, StudyLogServiceError> {
        let logs = self.logs.logs_since(user, self.since(days)).await?;
        let (dates, durations) = logs.iter().map(|l| (l.date, l.duration_minutes)).unzip();
        Ok(StudySeries { dates, durations })
    }

    /// Consecutive days, ending today, with at least one log.
    ///
    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn streak(&self, user: UserId) -> Result<u32, StudyLogServiceError> {
        let dates = self.logs.study_dates(user, self.since(MAX_STREAK_DAYS)).await?;
        Ok(study_streak(&dates, self.clock.today()))
    }

    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn minutes_since(&self, user: UserId, days: u32) -> Result<u64, StudyLogServiceError> {
        Ok(self.logs.minutes_since(user, self.since(days)).await?)
    }

    /// Hours studied in the last `days` days, one decimal.
    ///
    /// # Errors
    ///
    /// Returns `StudyLogServiceError::Storage` if repository access fails.
    pub async fn hours_since(&self, user: UserId, days: u32) -> Result<f64, StudyLogServiceError> {
        Ok(minutes_to_hours(self.minutes_since(user, days).await?))
    }

    fn since(&self, days: u32) -> NaiveDate {
        days_before(self.clock.today(), days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storage::InMemoryRepository;
    use storage::repository::{NewUser, UserRepository};
    use tracker_core::model::Subject;
    use tracker_core::time::fixed_now;

    async fn setup() -> (StudyLogService, UserId) {
        let repo = InMemoryRepository::new();
        let user = repo
            .insert_user(NewUser {
                username: "asha".into(),
                email: "asha@example.com".into(),
                password_hash: "x".into(),
                full_name: None,
                target_exam_year: None,
                is_active: true,
                is_admin: false,
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        (
            StudyLogService::new(Clock::fixed(fixed_now()), Arc::new(repo)),
            user.id,
        )
    }

    fn draft(days_ago: i64, minutes: u32) -> StudyLogDraft {
        StudyLogDraft {
            date: fixed_now().date_naive() - Duration::days(days_ago),
            subject: Some(Subject::Physics),
            duration_minutes: minutes,
            notes: None,
        }
    }

    #[tokio::test]
    async fn streak_stops_at_first_gap() {
        let (service, user) = setup().await;
        for days_ago in [0, 1, 2, 4] {
            service.log_session(user, draft(days_ago, 45)).await.unwrap();
        }
        assert_eq!(service.streak(user).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn overview_and_series_report_totals() {
        let (service, user) = setup().await;
        service.log_session(user, draft(0, 120)).await.unwrap();
        service.log_session(user, draft(3, 60)).await.unwrap();
        service.log_session(user, draft(40, 90)).await.unwrap();

        let overview = service.overview(user).await.unwrap();
        assert_eq!(overview.recent.len(), 3);
        assert!((overview.total_hours() - 4.5).abs() < f64::EPSILON);
        assert!((overview.average_hours() - 1.5).abs() < f64::EPSILON);

        let series = service.series(user, 30).await.unwrap();
        assert_eq!(series.durations, vec![60, 120]);
        assert!((service.hours_since(user, 7).await.unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unbounded_window_covers_every_log() {
        let (service, user) = setup().await;
        service.log_session(user, draft(0, 30)).await.unwrap();
        service.log_session(user, draft(400, 45)).await.unwrap();

        let series = service.series(user, u32::MAX).await.unwrap();
        assert_eq!(series.durations, vec![45, 30]);
        assert_eq!(service.minutes_since(user, u32::MAX).await.unwrap(), 75);
    }

    #[tokio::test]
    async fn invalid_duration_is_rejected() {
        let (service, user) = setup().await;
        let err = service.log_session(user, draft(0, 0)).await.unwrap_err();
        assert!(matches!(err, StudyLogServiceError::Validation(_)));
    }
}
