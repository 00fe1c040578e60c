use sqlx::Row;
use tracker_core::model::{Chapter, NewRevision, RevisionEntry, RevisionId, RevisionLog, UserId};

use super::{
    SqliteRepository,
    chapter_repo::bind_update,
    mapping::{db, id_i64, map_revision_row, ser},
};
use crate::repository::{RevisionRepository, StorageError};

#[async_trait::async_trait]
impl RevisionRepository for SqliteRepository {
    async fn record_revision(
        &self,
        chapter: &Chapter,
        revision: NewRevision,
    ) -> Result<RevisionLog, StorageError> {
        if revision.chapter_id != chapter.id() || revision.user_id != chapter.user_id() {
            return Err(StorageError::Conflict);
        }

        let mut tx = self.pool.begin().await.map_err(db)?;

        let updated = bind_update(chapter)?
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        if updated.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        let res = sqlx::query(
            r"
                INSERT INTO revision_logs (
                    user_id, chapter_id, revised_at, revision_number, confidence_level, notes
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(id_i64("user_id", revision.user_id.value())?)
        .bind(id_i64("chapter_id", revision.chapter_id.value())?)
        .bind(revision.revised_at)
        .bind(i64::from(revision.revision_number))
        .bind(revision.confidence.map(|c| i64::from(c.value())))
        .bind(&revision.notes)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(db)?;

        let id = RevisionId::new(
            u64::try_from(res.last_insert_rowid())
                .map_err(|_| StorageError::Serialization("revision_id sign overflow".into()))?,
        );
        Ok(RevisionLog {
            id,
            user_id: revision.user_id,
            chapter_id: revision.chapter_id,
            revised_at: revision.revised_at,
            revision_number: revision.revision_number,
            confidence: revision.confidence,
            notes: revision.notes,
        })
    }

    async fn recent_revisions(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<RevisionEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    r.id, r.user_id, r.chapter_id, r.revised_at, r.revision_number,
                    r.confidence_level, r.notes,
                    c.subject, c.chapter_name
                FROM revision_logs r
                JOIN chapter_progress c ON c.id = r.chapter_id
                WHERE r.user_id = ?1
                ORDER BY r.revised_at DESC, r.id DESC
                LIMIT ?2
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let subject: String = row.try_get("subject").map_err(ser)?;
            out.push(RevisionEntry {
                log: map_revision_row(&row)?,
                subject: subject.parse().map_err(ser)?,
                chapter_name: row.try_get("chapter_name").map_err(ser)?,
            });
        }
        Ok(out)
    }
}
