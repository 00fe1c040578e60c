use tracker_core::model::{AdminLogEntry, AdminLogId, NewAdminLog};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, map_admin_log_row},
};
use crate::repository::{AdminLogRepository, StorageError};

#[async_trait::async_trait]
impl AdminLogRepository for SqliteRepository {
    async fn append_admin_log(&self, entry: NewAdminLog) -> Result<AdminLogEntry, StorageError> {
        let target = entry
            .target_user_id
            .map(|id| id_i64("target_user_id", id.value()))
            .transpose()?;
        let res = sqlx::query(
            r"
                INSERT INTO admin_logs (admin_id, target_user_id, action, description, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(id_i64("admin_id", entry.admin_id.value())?)
        .bind(target)
        .bind(entry.action.as_str())
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = AdminLogId::new(u64::try_from(res.last_insert_rowid()).unwrap_or_default());
        Ok(AdminLogEntry::from_new(id, entry))
    }

    async fn recent_admin_logs(&self, limit: u32) -> Result<Vec<AdminLogEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, admin_id, target_user_id, action, description, created_at
                FROM admin_logs
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;
        rows.iter().map(map_admin_log_row).collect()
    }
}
