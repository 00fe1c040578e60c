use serde::{Deserialize, Serialize};

/// Administrator account created on first start.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdminConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_owned()
}

fn default_email() -> String {
    "admin@neetstudy.com".to_owned()
}

fn default_password() -> String {
    "admin123".to_owned()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            email: default_email(),
            password: default_password(),
        }
    }
}

impl AdminConfig {
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password == default_password()
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
