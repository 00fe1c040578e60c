use tracker_core::model::{UserAccount, UserId};

use super::{
    SqliteRepository,
    mapping::{db, id_i64, lookup_id, map_user_row, user_id_from_i64},
};
use crate::repository::{NewUser, StorageError, UserFilter, UserRepository};

const USER_COLUMNS: &str = r"
    id, username, email, password_hash, full_name, target_exam_year,
    is_active, is_admin, created_at, last_login, approved_at, approved_by
";

fn filter_clause(filter: UserFilter) -> &'static str {
    match filter {
        UserFilter::Members => "is_admin = 0",
        UserFilter::Active => "is_admin = 0 AND is_active = 1",
        UserFilter::Pending => "is_admin = 0 AND is_active = 0",
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO users (
                username, email, password_hash, full_name, target_exam_year,
                is_active, is_admin, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.target_exam_year.map(i64::from))
        .bind(user.is_active)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        let id = user_id_from_i64(res.last_insert_rowid())?;
        Ok(user.into_account(id))
    }

    async fn get_user(&self, id: UserId) -> Result<UserAccount, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(lookup_id(id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?
            .ok_or(StorageError::NotFound)?;
        map_user_row(&row)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.as_ref().map(map_user_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 COLLATE NOCASE");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.as_ref().map(map_user_row).transpose()
    }

    async fn update_user(&self, user: &UserAccount) -> Result<(), StorageError> {
        let approved_by = user
            .approved_by
            .map(|id| id_i64("approved_by", id.value()))
            .transpose()?;
        let res = sqlx::query(
            r"
            UPDATE users SET
                email = ?2,
                password_hash = ?3,
                full_name = ?4,
                target_exam_year = ?5,
                is_active = ?6,
                last_login = ?7,
                approved_at = ?8,
                approved_by = ?9
            WHERE id = ?1
            ",
        )
        .bind(id_i64("user_id", user.id.value())?)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.target_exam_year.map(i64::from))
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(user.approved_at)
        .bind(approved_by)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(lookup_id(id.value())?)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn count_users(&self, filter: UserFilter) -> Result<u64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM users WHERE {}", filter_clause(filter));
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(db)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<UserAccount>, StorageError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} \
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
            filter_clause(filter)
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .bind(id_i64("offset", offset)?)
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(map_user_row(&row)?);
        }
        Ok(users)
    }
}
