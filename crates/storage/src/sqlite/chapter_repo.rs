use chrono::{DateTime, Utc};
use tracker_core::model::{Chapter, ChapterId, NewChapter, UserId};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, lookup_id, map_chapter_row},
};
use crate::repository::{ChapterRepository, StorageError};

pub(super) const CHAPTER_COLUMNS: &str = r"
    id, user_id, subject, chapter_name, chapter_order,
    ncert_read, lecture_watched, questions_solved, revised,
    revision_count, last_revised_at, created_at, updated_at
";

pub(super) const UPDATE_CHAPTER_SQL: &str = r"
    UPDATE chapter_progress SET
        ncert_read = ?2,
        lecture_watched = ?3,
        questions_solved = ?4,
        revised = ?5,
        revision_count = ?6,
        last_revised_at = ?7,
        updated_at = ?8
    WHERE id = ?1
";

pub(super) fn bind_update<'q>(
    chapter: &'q Chapter,
) -> Result<sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>, StorageError>
{
    let flags = chapter.flags();
    Ok(sqlx::query(UPDATE_CHAPTER_SQL)
        .bind(id_i64("chapter_id", chapter.id().value())?)
        .bind(flags.ncert_read)
        .bind(flags.lecture_watched)
        .bind(flags.questions_solved)
        .bind(flags.revised)
        .bind(i64::from(chapter.revision_count()))
        .bind(chapter.last_revised_at())
        .bind(chapter.updated_at()))
}

#[async_trait::async_trait]
impl ChapterRepository for SqliteRepository {
    async fn insert_chapters(&self, chapters: &[NewChapter]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        for chapter in chapters {
            sqlx::query(
                r"
                INSERT INTO chapter_progress (
                    user_id, subject, chapter_name, chapter_order, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                ",
            )
            .bind(id_i64("user_id", chapter.user_id.value())?)
            .bind(chapter.subject.as_str())
            .bind(&chapter.name)
            .bind(i64::from(chapter.order))
            .bind(chapter.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }
        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, StorageError> {
        let sql = format!("SELECT {CHAPTER_COLUMNS} FROM chapter_progress WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(lookup_id(id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?
            .ok_or(StorageError::NotFound)?;
        map_chapter_row(&row)
    }

    async fn chapters_for_user(&self, user_id: UserId) -> Result<Vec<Chapter>, StorageError> {
        let sql = format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter_progress WHERE user_id = ?1 \
             ORDER BY CASE subject WHEN 'Physics' THEN 0 WHEN 'Chemistry' THEN 1 ELSE 2 END, \
             chapter_order, id"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;

        let mut chapters = Vec::with_capacity(rows.len());
        for row in rows {
            chapters.push(map_chapter_row(&row)?);
        }
        Ok(chapters)
    }

    async fn update_chapter(&self, chapter: &Chapter) -> Result<(), StorageError> {
        let res = bind_update(chapter)?
            .execute(&self.pool)
            .await
            .map_err(db)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn count_needing_revision(
        &self,
        user_id: UserId,
        before: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM chapter_progress
            WHERE user_id = ?1
              AND revised = 1
              AND last_revised_at IS NOT NULL
              AND last_revised_at < ?2
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(before)
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
