use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{AdminLogId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown admin action: {0}")]
pub struct UnknownAdminAction(pub String);

/// Administrative action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    Approve,
    Reject,
    View,
    Deactivate,
    Delete,
}

impl AdminAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AdminAction::Approve => "approve",
            AdminAction::Reject => "reject",
            AdminAction::View => "view",
            AdminAction::Deactivate => "deactivate",
            AdminAction::Delete => "delete",
        }
    }

    /// Audit description for an action taken on `username`.
    #[must_use]
    pub fn describe(self, username: &str) -> String {
        match self {
            AdminAction::Approve => format!("Approved user: {username}"),
            AdminAction::Reject => format!("Rejected and deleted user: {username}"),
            AdminAction::View => format!("Viewed progress for user: {username}"),
            AdminAction::Deactivate => format!("Deactivated user: {username}"),
            AdminAction::Delete => format!("Permanently deleted user: {username}"),
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminAction {
    type Err = UnknownAdminAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(AdminAction::Approve),
            "reject" => Ok(AdminAction::Reject),
            "view" => Ok(AdminAction::View),
            "deactivate" => Ok(AdminAction::Deactivate),
            "delete" => Ok(AdminAction::Delete),
            other => Err(UnknownAdminAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdminLog {
    pub admin_id: UserId,
    pub target_user_id: Option<UserId>,
    pub action: AdminAction,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLogEntry {
    pub id: AdminLogId,
    pub admin_id: UserId,
    pub target_user_id: Option<UserId>,
    pub action: AdminAction,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl AdminLogEntry {
    #[must_use]
    pub fn from_new(id: AdminLogId, new: NewAdminLog) -> Self {
        Self {
            id,
            admin_id: new.admin_id,
            target_user_id: new.target_user_id,
            action: new.action,
            description: new.description,
            created_at: new.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_name_the_target() {
        assert_eq!(AdminAction::Approve.describe("asha"), "Approved user: asha");
        assert_eq!(
            AdminAction::Reject.describe("ravi"),
            "Rejected and deleted user: ravi"
        );
    }

    #[test]
    fn parses_stored_action() {
        assert_eq!("deactivate".parse::<AdminAction>().unwrap(), AdminAction::Deactivate);
        assert!("promote".parse::<AdminAction>().is_err());
    }
}
