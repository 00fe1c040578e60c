use std::sync::Arc;

use storage::repository::{AdminLogRepository, StorageError, UserFilter, UserRepository};
use tracker_core::model::{AdminAction, AdminLogEntry, NewAdminLog, UserAccount, UserId};

use crate::Clock;
use crate::dashboard_service::{DashboardService, UserProgress};
use crate::error::AdminError;

const RECENT_USERS: u32 = 10;
const RECENT_ACTIONS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOverview {
    pub total_users: u64,
    pub active_users: u64,
    pub pending_users: u64,
    pub recent_users: Vec<UserAccount>,
    pub recent_actions: Vec<AdminLogEntry>,
}

/// One page of the member list, newest first. Pages start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<UserAccount>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl UserPage {
    #[must_use]
    pub fn pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(u64::from(self.per_page))).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }
}

/// Member approval and moderation. Every state change is written to the
/// admin log.
#[derive(Clone)]
pub struct AdminService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    admin_logs: Arc<dyn AdminLogRepository>,
    dashboard: Arc<DashboardService>,
    users_per_page: u32,
}

impl AdminService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        admin_logs: Arc<dyn AdminLogRepository>,
        dashboard: Arc<DashboardService>,
        users_per_page: u32,
    ) -> Self {
        Self {
            clock,
            users,
            admin_logs,
            dashboard,
            users_per_page: users_per_page.max(1),
        }
    }

    /// # Errors
    ///
    /// Returns `AdminError::Storage` if repository access fails.
    pub async fn overview(&self) -> Result<AdminOverview, AdminError> {
        Ok(AdminOverview {
            total_users: self.users.count_users(UserFilter::Members).await?,
            active_users: self.users.count_users(UserFilter::Active).await?,
            pending_users: self.users.count_users(UserFilter::Pending).await?,
            recent_users: self
                .users
                .list_users(UserFilter::Members, 0, RECENT_USERS)
                .await?,
            recent_actions: self.admin_logs.recent_admin_logs(RECENT_ACTIONS).await?,
        })
    }

    /// Accounts awaiting approval, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if repository access fails.
    pub async fn pending(&self) -> Result<Vec<UserAccount>, AdminError> {
        let count = self.users.count_users(UserFilter::Pending).await?;
        let limit = u32::try_from(count).unwrap_or(u32::MAX);
        Ok(self.users.list_users(UserFilter::Pending, 0, limit).await?)
    }

    /// # Errors
    ///
    /// Returns `UserNotFound`, `ProtectedAccount` for admins, or `Storage`.
    pub async fn approve(&self, admin: UserId, target: UserId) -> Result<UserAccount, AdminError> {
        let mut user = self.member(target).await?;
        user.approve(admin, self.clock.now());
        self.users.update_user(&user).await?;
        self.record(admin, Some(target), AdminAction::Approve, &user.username)
            .await?;
        tracing::info!(admin_id = %admin, user_id = %target, "user approved");
        Ok(user)
    }

    /// Reject a registration by deleting the account. Returns the username.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `ProtectedAccount` for admins, or `Storage`.
    pub async fn reject(&self, admin: UserId, target: UserId) -> Result<String, AdminError> {
        self.remove(admin, target, AdminAction::Reject).await
    }

    /// # Errors
    ///
    /// Returns `UserNotFound`, `ProtectedAccount` for admins, or `Storage`.
    pub async fn deactivate(
        &self,
        admin: UserId,
        target: UserId,
    ) -> Result<UserAccount, AdminError> {
        let mut user = self.member(target).await?;
        user.deactivate();
        self.users.update_user(&user).await?;
        self.record(admin, Some(target), AdminAction::Deactivate, &user.username)
            .await?;
        tracing::info!(admin_id = %admin, user_id = %target, "user deactivated");
        Ok(user)
    }

    /// Permanently delete an account and all of its data. Returns the username.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `ProtectedAccount` for admins, or `Storage`.
    pub async fn delete(&self, admin: UserId, target: UserId) -> Result<String, AdminError> {
        self.remove(admin, target, AdminAction::Delete).await
    }

    /// # Errors
    ///
    /// Returns `AdminError::Storage` if repository access fails.
    pub async fn manage(&self, page: u32) -> Result<UserPage, AdminError> {
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(self.users_per_page);
        let total = self.users.count_users(UserFilter::Members).await?;
        let users = self
            .users
            .list_users(UserFilter::Members, offset, self.users_per_page)
            .await?;
        Ok(UserPage {
            users,
            page,
            per_page: self.users_per_page,
            total,
        })
    }

    /// Read-only progress for a member; the visit is logged.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `ProtectedAccount` for admins, `Dashboard` or `Storage`.
    pub async fn view_user(
        &self,
        admin: UserId,
        target: UserId,
    ) -> Result<(UserAccount, UserProgress), AdminError> {
        let user = self.member(target).await?;
        self.record(admin, Some(target), AdminAction::View, &user.username)
            .await?;
        let progress = self.dashboard.user_progress(target).await?;
        Ok((user, progress))
    }

    async fn remove(
        &self,
        admin: UserId,
        target: UserId,
        action: AdminAction,
    ) -> Result<String, AdminError> {
        let user = self.member(target).await?;
        self.users.delete_user(target).await?;
        self.record(admin, None, action, &user.username).await?;
        tracing::info!(admin_id = %admin, username = %user.username, %action, "user removed");
        Ok(user.username)
    }

    async fn member(&self, id: UserId) -> Result<UserAccount, AdminError> {
        let user = match self.users.get_user(id).await {
            Ok(user) => user,
            Err(StorageError::NotFound) => return Err(AdminError::UserNotFound),
            Err(e) => return Err(e.into()),
        };
        if user.is_admin {
            tracing::warn!(user_id = %id, "refused admin action on an admin account");
            return Err(AdminError::ProtectedAccount);
        }
        Ok(user)
    }

    async fn record(
        &self,
        admin: UserId,
        target: Option<UserId>,
        action: AdminAction,
        username: &str,
    ) -> Result<AdminLogEntry, AdminError> {
        Ok(self
            .admin_logs
            .append_admin_log(NewAdminLog {
                admin_id: admin,
                target_user_id: target,
                action,
                description: action.describe(username),
                created_at: self.clock.now(),
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math_rounds_up() {
        let page = UserPage {
            users: Vec::new(),
            page: 2,
            per_page: 20,
            total: 41,
        };
        assert_eq!(page.pages(), 3);
        assert!(page.has_prev());
        assert!(page.has_next());

        let empty = UserPage {
            users: Vec::new(),
            page: 1,
            per_page: 20,
            total: 0,
        };
        assert_eq!(empty.pages(), 0);
        assert!(!empty.has_next());
    }
}
