use chrono::NaiveDate;
use tracker_core::model::{PomodoroCompletion, PomodoroDay, UserId};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, map_pomodoro_row},
};
use crate::repository::{PomodoroRepository, StorageError};

const DAY_COLUMNS: &str =
    "id, user_id, session_date, sessions_completed, total_focus_minutes, subject, created_at";

#[async_trait::async_trait]
impl PomodoroRepository for SqliteRepository {
    async fn record_completion(
        &self,
        completion: PomodoroCompletion,
    ) -> Result<PomodoroDay, StorageError> {
        let sql = format!(
            r"
            INSERT INTO pomodoro_days (
                user_id, session_date, sessions_completed, total_focus_minutes, subject, created_at
            )
            VALUES (?1, ?2, 1, ?3, ?4, ?5)
            ON CONFLICT(user_id, session_date) DO UPDATE SET
                sessions_completed = sessions_completed + 1,
                total_focus_minutes = total_focus_minutes + excluded.total_focus_minutes,
                subject = COALESCE(excluded.subject, subject)
            RETURNING {DAY_COLUMNS}
            "
        );
        let row = sqlx::query(&sql)
            .bind(id_i64("user_id", completion.user_id.value())?)
            .bind(completion.date)
            .bind(i64::from(completion.focus_minutes))
            .bind(completion.subject.map(|s| s.as_str()))
            .bind(completion.completed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db)?;
        map_pomodoro_row(&row)
    }

    async fn day(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<PomodoroDay>, StorageError> {
        let sql = format!(
            "SELECT {DAY_COLUMNS} FROM pomodoro_days WHERE user_id = ?1 AND session_date = ?2"
        );
        let row = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.as_ref().map(map_pomodoro_row).transpose()
    }

    async fn days_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<PomodoroDay>, StorageError> {
        let sql = format!(
            "SELECT {DAY_COLUMNS} FROM pomodoro_days WHERE user_id = ?1 AND session_date >= ?2 \
             ORDER BY session_date ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.iter().map(map_pomodoro_row).collect()
    }
}
