use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("Username must be between 3 and 64 characters")]
    InvalidUsername,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Full name must be at most 128 characters")]
    FullNameTooLong,

    #[error("Please enter a valid year")]
    InvalidTargetYear,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords must match")]
    PasswordMismatch,
}

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 64;
pub const FULL_NAME_MAX: usize = 128;
pub const PASSWORD_MIN: usize = 6;
pub const TARGET_YEAR_MIN: u16 = 2024;
pub const TARGET_YEAR_MAX: u16 = 2030;

//
// ─── REGISTRATION ──────────────────────────────────────────────────────────────
//

/// Raw sign-up input as submitted by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub target_exam_year: Option<u16>,
    pub password: String,
    pub confirm_password: String,
}

/// Registration input that passed validation; the password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub target_exam_year: Option<u16>,
    pub password: String,
}

impl RegistrationDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns the first `RegistrationError` found, in form field order.
    pub fn validate(self) -> Result<ValidRegistration, RegistrationError> {
        let username = self.username.trim().to_string();
        let username_len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
            return Err(RegistrationError::InvalidUsername);
        }

        let email = self.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(RegistrationError::InvalidEmail);
        }

        let full_name = normalize_optional(self.full_name);
        if full_name
            .as_ref()
            .is_some_and(|name| name.chars().count() > FULL_NAME_MAX)
        {
            return Err(RegistrationError::FullNameTooLong);
        }

        if let Some(year) = self.target_exam_year
            && !(TARGET_YEAR_MIN..=TARGET_YEAR_MAX).contains(&year)
        {
            return Err(RegistrationError::InvalidTargetYear);
        }

        if self.password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        Ok(ValidRegistration {
            username,
            email,
            full_name,
            target_exam_year: self.target_exam_year,
            password: self.password,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    has_dot && labels.all(|label| !label.is_empty())
}

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

//
// ─── ACCOUNT ───────────────────────────────────────────────────────────────────
//

/// Persisted user account.
///
/// New accounts start inactive and are activated by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub target_exam_year: Option<u16>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
}

impl UserAccount {
    /// Whether the account may use the tracker pages (active or admin).
    #[must_use]
    pub fn can_track(&self) -> bool {
        self.is_active || self.is_admin
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.is_active && !self.is_admin
    }

    /// Name shown in greetings: full name when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }

    pub fn approve(&mut self, admin: UserId, now: DateTime<Utc>) {
        self.is_active = true;
        self.approved_at = Some(now);
        self.approved_by = Some(admin);
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
