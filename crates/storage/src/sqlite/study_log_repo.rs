use chrono::NaiveDate;
use tracker_core::model::{NewStudyLog, StudyLog, StudyLogId, StudyTotals, UserId};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, map_study_log_row},
};
use crate::repository::{StorageError, StudyLogRepository};

const LOG_COLUMNS: &str =
    "id, user_id, study_date, subject, duration_minutes, notes, created_at";

fn non_negative(v: i64) -> u64 {
    u64::try_from(v).unwrap_or_default()
}

#[async_trait::async_trait]
impl StudyLogRepository for SqliteRepository {
    async fn insert_log(&self, log: NewStudyLog) -> Result<StudyLog, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO study_logs (user_id, study_date, subject, duration_minutes, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(id_i64("user_id", log.user_id.value())?)
        .bind(log.date)
        .bind(log.subject.map(|s| s.as_str()))
        .bind(i64::from(log.duration_minutes))
        .bind(&log.notes)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = StudyLogId::new(non_negative(res.last_insert_rowid()));
        Ok(StudyLog::from_new(id, log))
    }

    async fn recent_logs(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<StudyLog>, StorageError> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM study_logs WHERE user_id = ?1 \
             ORDER BY study_date DESC, id DESC LIMIT ?2"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.iter().map(map_study_log_row).collect()
    }

    async fn logs_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<StudyLog>, StorageError> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM study_logs WHERE user_id = ?1 AND study_date >= ?2 \
             ORDER BY study_date ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.iter().map(map_study_log_row).collect()
    }

    async fn totals(&self, user_id: UserId) -> Result<StudyTotals, StorageError> {
        let (minutes, sessions): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(duration_minutes), 0), COUNT(*) FROM study_logs WHERE user_id = ?1",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;
        Ok(StudyTotals {
            total_minutes: non_negative(minutes),
            sessions: non_negative(sessions),
        })
    }

    async fn minutes_since(&self, user_id: UserId, since: NaiveDate) -> Result<u64, StorageError> {
        let minutes: i64 = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(duration_minutes), 0) FROM study_logs
            WHERE user_id = ?1 AND study_date >= ?2
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;
        Ok(non_negative(minutes))
    }

    async fn study_dates(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<NaiveDate>, StorageError> {
        sqlx::query_scalar(
            r"
            SELECT DISTINCT study_date FROM study_logs
            WHERE user_id = ?1 AND study_date >= ?2
            ORDER BY study_date DESC
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db)
    }
}
