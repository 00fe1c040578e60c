//! General application configuration.

use serde::{Deserialize, Serialize};

const fn default_reminder_days() -> u32 {
    7
}

const fn default_users_per_page() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Days after the last revision before a chapter is flagged again.
    #[serde(default = "default_reminder_days")]
    pub revision_reminder_days: u32,

    /// Page size of the admin user list.
    #[serde(default = "default_users_per_page")]
    pub users_per_page: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            revision_reminder_days: default_reminder_days(),
            users_per_page: default_users_per_page(),
        }
    }
}
