use std::sync::Arc;

use storage::repository::{ChapterRepository, NewUser, StorageError, UserRepository};
use tracker_core::model::{RegistrationDraft, UserAccount, UserId};
use tracker_core::syllabus;

use crate::Clock;
use crate::error::AuthError;
use crate::password::{self, DEFAULT_ITERATIONS};

/// Which login form an authentication attempt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPortal {
    /// Accepts approved members and administrators.
    User,
    /// Accepts administrators only.
    Admin,
}

/// Credentials for the administrator account created on first start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration, login and the administrator bootstrap.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    chapters: Arc<dyn ChapterRepository>,
    hash_iterations: u32,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        chapters: Arc<dyn ChapterRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            chapters,
            hash_iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the PBKDF2 work factor for newly hashed passwords.
    #[must_use]
    pub fn with_hash_iterations(mut self, iterations: u32) -> Self {
        self.hash_iterations = iterations.max(1);
        self
    }

    /// Create an inactive account and seed its syllabus chapters.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Registration` for invalid input,
    /// `UsernameTaken`/`EmailTaken` for duplicates, or `Storage` on failure.
    pub async fn register(&self, draft: RegistrationDraft) -> Result<UserAccount, AuthError> {
        let valid = draft.validate()?;
        if self.users.find_by_username(&valid.username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.users.find_by_email(&valid.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let now = self.clock.now();
        let user = self
            .users
            .insert_user(NewUser {
                username: valid.username,
                email: valid.email,
                password_hash: password::hash_with_iterations(
                    &valid.password,
                    self.hash_iterations,
                ),
                full_name: valid.full_name,
                target_exam_year: valid.target_exam_year,
                is_active: false,
                is_admin: false,
                created_at: now,
            })
            .await
            .map_err(|e| match e {
                StorageError::Conflict => AuthError::UsernameTaken,
                other => AuthError::Storage(other),
            })?;

        let chapters = syllabus::seed_chapters(user.id, now)
            .map_err(|e| AuthError::Syllabus(e.to_string()))?;
        self.chapters.insert_chapters(&chapters).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "registered new user");
        Ok(user)
    }

    /// Check credentials and stamp `last_login`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials`, `PendingApproval` or `NotAdmin` when the
    /// login is refused, or `Storage` on failure.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        portal: LoginPortal,
    ) -> Result<UserAccount, AuthError> {
        let found = self.users.find_by_username(username.trim()).await?;
        let Some(mut user) =
            found.filter(|u| password::verify_password(password, &u.password_hash))
        else {
            tracing::warn!(username, ?portal, "rejected login: bad credentials");
            return Err(AuthError::InvalidCredentials);
        };

        match portal {
            LoginPortal::Admin if !user.is_admin => {
                tracing::warn!(user_id = %user.id, "rejected admin login: not an admin");
                return Err(AuthError::NotAdmin);
            }
            LoginPortal::User if user.is_pending() => {
                tracing::warn!(user_id = %user.id, "rejected login: pending approval");
                return Err(AuthError::PendingApproval);
            }
            _ => {}
        }

        user.last_login = Some(self.clock.now());
        self.users.update_user(&user).await?;
        tracing::info!(user_id = %user.id, ?portal, "user logged in");
        Ok(user)
    }

    /// Create the configured administrator unless an account with that
    /// username already exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the lookup or insert fails.
    pub async fn ensure_admin(&self, bootstrap: &AdminBootstrap) -> Result<UserAccount, AuthError> {
        if let Some(existing) = self.users.find_by_username(&bootstrap.username).await? {
            return Ok(existing);
        }
        let admin = self
            .users
            .insert_user(NewUser {
                username: bootstrap.username.clone(),
                email: bootstrap.email.trim().to_lowercase(),
                password_hash: password::hash_with_iterations(
                    &bootstrap.password,
                    self.hash_iterations,
                ),
                full_name: Some("System Administrator".to_owned()),
                target_exam_year: None,
                is_active: true,
                is_admin: true,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(user_id = %admin.id, username = %admin.username, "created admin account");
        Ok(admin)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` (`NotFound` for unknown ids).
    pub async fn user(&self, id: UserId) -> Result<UserAccount, AuthError> {
        Ok(self.users.get_user(id).await?)
    }

    /// Look up an active account by username without a password check.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown usernames and
    /// `AuthError::PendingApproval` for accounts that cannot track yet.
    pub async fn member_by_username(&self, username: &str) -> Result<UserAccount, AuthError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.can_track() {
            return Err(AuthError::PendingApproval);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryRepository;
    use tracker_core::time::fixed_now;

    fn service() -> AuthService {
        let repo = InMemoryRepository::new();
        AuthService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo),
        )
        .with_hash_iterations(1_000)
    }

    fn draft(username: &str, email: &str) -> RegistrationDraft {
        RegistrationDraft {
            username: username.into(),
            email: email.into(),
            full_name: None,
            target_exam_year: Some(2026),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn registration_rejects_duplicates() {
        let auth = service();
        auth.register(draft("asha", "asha@example.com")).await.unwrap();

        let err = auth
            .register(draft("asha", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));

        let err = auth
            .register(draft("ravi", "Asha@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn pending_user_cannot_log_in_until_approved() {
        let auth = service();
        let user = auth.register(draft("asha", "asha@example.com")).await.unwrap();
        assert!(user.is_pending());

        let err = auth
            .authenticate("asha", "secret1", LoginPortal::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PendingApproval));

        let err = auth
            .authenticate("asha", "wrong", LoginPortal::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn admin_portal_only_accepts_admins() {
        let auth = service();
        let bootstrap = AdminBootstrap {
            username: "admin".into(),
            email: "admin@neetstudy.com".into(),
            password: "admin123".into(),
        };
        let admin = auth.ensure_admin(&bootstrap).await.unwrap();
        let again = auth.ensure_admin(&bootstrap).await.unwrap();
        assert_eq!(admin.id, again.id);

        let logged_in = auth
            .authenticate("admin", "admin123", LoginPortal::Admin)
            .await
            .unwrap();
        assert_eq!(logged_in.last_login, Some(fixed_now()));
        assert!(
            auth.authenticate("admin", "admin123", LoginPortal::User)
                .await
                .is_ok()
        );

        auth.register(draft("asha", "asha@example.com")).await.unwrap();
        let err = auth
            .authenticate("asha", "secret1", LoginPortal::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotAdmin));
    }

    #[tokio::test]
    async fn member_lookup_skips_pending_and_unknown_accounts() {
        let auth = service();
        auth.register(draft("asha", "asha@example.com")).await.unwrap();

        let err = auth.member_by_username("asha").await.unwrap_err();
        assert!(matches!(err, AuthError::PendingApproval));
        let err = auth.member_by_username("nobody").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
