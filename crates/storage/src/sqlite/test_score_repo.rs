use tracker_core::model::{NewTestScore, TestScore, TestScoreId, UserId};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, map_test_score_row, marks_i64},
};
use crate::repository::{StorageError, TestScoreRepository};

#[async_trait::async_trait]
impl TestScoreRepository for SqliteRepository {
    async fn insert_test(&self, test: NewTestScore) -> Result<TestScore, StorageError> {
        let (physics_score, physics_total) = marks_i64(test.physics);
        let (chemistry_score, chemistry_total) = marks_i64(test.chemistry);
        let (biology_score, biology_total) = marks_i64(test.biology);

        let res = sqlx::query(
            r"
            INSERT INTO test_scores (
                user_id, test_name, test_date, test_type,
                physics_score, physics_total, chemistry_score, chemistry_total,
                biology_score, biology_total, total_score, total_marks,
                percentage, notes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ",
        )
        .bind(id_i64("user_id", test.user_id.value())?)
        .bind(&test.name)
        .bind(test.date)
        .bind(test.test_type.as_str())
        .bind(physics_score)
        .bind(physics_total)
        .bind(chemistry_score)
        .bind(chemistry_total)
        .bind(biology_score)
        .bind(biology_total)
        .bind(i64::from(test.total_score))
        .bind(i64::from(test.total_marks))
        .bind(test.percentage)
        .bind(&test.notes)
        .bind(test.created_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = TestScoreId::new(u64::try_from(res.last_insert_rowid()).unwrap_or_default());
        Ok(TestScore::from_new(id, test))
    }

    async fn tests_for_user(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<TestScore>, StorageError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, i64::from);
        let rows = sqlx::query(
            r"
            SELECT
                id, user_id, test_name, test_date, test_type,
                physics_score, physics_total, chemistry_score, chemistry_total,
                biology_score, biology_total, total_score, total_marks,
                percentage, notes, created_at
            FROM test_scores
            WHERE user_id = ?1
            ORDER BY test_date DESC, id DESC
            LIMIT ?2
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.iter().map(map_test_score_row).collect()
    }
}
