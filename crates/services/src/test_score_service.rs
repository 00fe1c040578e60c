use std::sync::Arc;

use chrono::NaiveDate;
use storage::repository::TestScoreRepository;
use tracker_core::model::{Subject, TestScore, TestScoreDraft, UserId};

use crate::Clock;
use crate::error::TestScoreServiceError;

/// Chart data for the test tracker, oldest test first.
///
/// Subject lists only hold entries for tests that recorded that subject's
/// total, so they can be shorter than `dates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSeries {
    pub dates: Vec<NaiveDate>,
    pub percentages: Vec<f64>,
    pub physics: Vec<f64>,
    pub chemistry: Vec<f64>,
    pub biology: Vec<f64>,
}

#[derive(Clone)]
pub struct TestScoreService {
    clock: Clock,
    tests: Arc<dyn TestScoreRepository>,
}

impl TestScoreService {
    #[must_use]
    pub fn new(clock: Clock, tests: Arc<dyn TestScoreRepository>) -> Self {
        Self { clock, tests }
    }

    /// # Errors
    ///
    /// Returns `Validation` for invalid marks or `Storage` on failure.
    pub async fn record(
        &self,
        user: UserId,
        draft: TestScoreDraft,
    ) -> Result<TestScore, TestScoreServiceError> {
        let new = draft.validate(user, self.clock.now())?;
        let test = self.tests.insert_test(new).await?;
        tracing::info!(
            user_id = %user,
            test = %test.name,
            percentage = test.percentage,
            "test score recorded"
        );
        Ok(test)
    }

    /// All tests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `TestScoreServiceError::Storage` if repository access fails.
    pub async fn list(&self, user: UserId) -> Result<Vec<TestScore>, TestScoreServiceError> {
        Ok(self.tests.tests_for_user(user, None).await?)
    }

    /// # Errors
    ///
    /// Returns `TestScoreServiceError::Storage` if repository access fails.
    pub async fn recent(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<TestScore>, TestScoreServiceError> {
        Ok(self.tests.tests_for_user(user, Some(limit)).await?)
    }

    /// # Errors
    ///
    /// Returns `TestScoreServiceError::Storage` if repository access fails.
    pub async fn series(&self, user: UserId) -> Result<TestSeries, TestScoreServiceError> {
        let mut tests = self.tests.tests_for_user(user, None).await?;
        tests.reverse();

        let mut series = TestSeries::default();
        for test in &tests {
            series.dates.push(test.date);
            series.percentages.push(test.percentage);
            for (subject, bucket) in [
                (Subject::Physics, &mut series.physics),
                (Subject::Chemistry, &mut series.chemistry),
                (Subject::Biology, &mut series.biology),
            ] {
                if let Some(pct) = test.subject_percentage(subject) {
                    bucket.push(pct);
                }
            }
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storage::InMemoryRepository;
    use storage::repository::{NewUser, UserRepository};
    use tracker_core::model::{SubjectMarks, TestType};
    use tracker_core::time::fixed_now;

    fn draft(name: &str, days_ago: i64, physics: SubjectMarks, score: u32) -> TestScoreDraft {
        TestScoreDraft {
            name: name.into(),
            date: fixed_now().date_naive() - Duration::days(days_ago),
            test_type: TestType::FullLength,
            physics,
            chemistry: SubjectMarks::default(),
            biology: SubjectMarks::default(),
            total_score: score,
            total_marks: 720,
            notes: None,
        }
    }

    #[tokio::test]
    async fn series_is_oldest_first_and_skips_missing_subjects() {
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
        let service = TestScoreService::new(Clock::fixed(fixed_now()), Arc::new(repo));

        service
            .record(user.id, draft("Mock 2", 1, SubjectMarks::default(), 540))
            .await
            .unwrap();
        service
            .record(
                user.id,
                draft("Mock 1", 10, SubjectMarks::new(Some(90), Some(180)), 360),
            )
            .await
            .unwrap();

        let listed = service.list(user.id).await.unwrap();
        assert_eq!(listed[0].name, "Mock 2");

        let series = service.series(user.id).await.unwrap();
        assert_eq!(series.percentages, vec![50.0, 75.0]);
        assert_eq!(series.physics, vec![50.0]);
        assert!(series.chemistry.is_empty());

        let err = service
            .record(user.id, draft("Bad", 0, SubjectMarks::default(), 800))
            .await
            .unwrap_err();
        assert!(matches!(err, TestScoreServiceError::Validation(_)));
    }
}
