use std::sync::Arc;

use chrono::NaiveDate;
use storage::repository::PomodoroRepository;
use tracker_core::model::{
    PomodoroCompletion, PomodoroDay, PomodoroSettings, Subject, UserId, minutes_to_hours,
};
use tracker_core::time::days_before;

use crate::Clock;
use crate::error::PomodoroError;

/// Per-day focus counts for charts, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PomodoroStats {
    pub dates: Vec<NaiveDate>,
    pub sessions: Vec<u32>,
    pub total_sessions: u32,
    pub total_hours: f64,
}

/// Bookkeeping for completed focus intervals. The countdown itself runs
/// client-side and is never stored.
#[derive(Clone)]
pub struct PomodoroService {
    clock: Clock,
    days: Arc<dyn PomodoroRepository>,
    settings: PomodoroSettings,
}

impl PomodoroService {
    #[must_use]
    pub fn new(
        clock: Clock,
        days: Arc<dyn PomodoroRepository>,
        settings: PomodoroSettings,
    ) -> Self {
        Self {
            clock,
            days,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> PomodoroSettings {
        self.settings
    }

    /// Acknowledge the start of a focus interval. Nothing is persisted.
    #[must_use]
    pub fn start(&self, user: UserId, subject: Option<Subject>) -> &'static str {
        tracing::info!(user_id = %user, subject = ?subject, "pomodoro started");
        "Pomodoro started"
    }

    /// Count one completed work interval towards today's total.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::Storage` if the upsert fails.
    pub async fn complete(
        &self,
        user: UserId,
        subject: Option<Subject>,
    ) -> Result<PomodoroDay, PomodoroError> {
        let day = self
            .days
            .record_completion(PomodoroCompletion {
                user_id: user,
                date: self.clock.today(),
                focus_minutes: self.settings.work_minutes(),
                subject,
                completed_at: self.clock.now(),
            })
            .await?;
        tracing::info!(
            user_id = %user,
            sessions_today = day.sessions_completed,
            "pomodoro completed"
        );
        Ok(day)
    }

    /// # Errors
    ///
    /// Returns `PomodoroError::Storage` if repository access fails.
    pub async fn today_count(&self, user: UserId) -> Result<u32, PomodoroError> {
        let day = self.days.day(user, self.clock.today()).await?;
        Ok(day.map_or(0, |d| d.sessions_completed))
    }

    /// # Errors
    ///
    /// Returns `PomodoroError::Storage` if repository access fails.
    pub async fn stats(&self, user: UserId, days: u32) -> Result<PomodoroStats, PomodoroError> {
        let since = days_before(self.clock.today(), days);
        let rows = self.days.days_since(user, since).await?;
        let total_minutes: u64 = rows.iter().map(|d| u64::from(d.total_focus_minutes)).sum();
        Ok(PomodoroStats {
            dates: rows.iter().map(|d| d.date).collect(),
            sessions: rows.iter().map(|d| d.sessions_completed).collect(),
            total_sessions: rows.iter().map(|d| d.sessions_completed).sum(),
            total_hours: minutes_to_hours(total_minutes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryRepository;
    use storage::repository::{NewUser, UserRepository};
    use tracker_core::time::fixed_now;

    #[tokio::test]
    async fn completions_accumulate_into_today() {
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
        let service = PomodoroService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo),
            PomodoroSettings::default(),
        );

        assert_eq!(service.today_count(user.id).await.unwrap(), 0);
        assert_eq!(service.start(user.id, None), "Pomodoro started");
        service.complete(user.id, Some(Subject::Physics)).await.unwrap();
        let day = service.complete(user.id, None).await.unwrap();
        assert_eq!(day.sessions_completed, 2);
        assert_eq!(day.total_focus_minutes, 50);
        assert_eq!(day.subject, Some(Subject::Physics));

        let stats = service.stats(user.id, 7).await.unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.sessions, vec![2]);
        assert!((stats.total_hours - 0.8).abs() < f64::EPSILON);

        let all_time = service.stats(user.id, u32::MAX).await.unwrap();
        assert_eq!(all_time.total_sessions, 2);
    }
}
