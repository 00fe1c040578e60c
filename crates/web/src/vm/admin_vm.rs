use services::UserPage;
use tracker_core::model::{AdminLogEntry, UserAccount};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRowVm {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub target_year: String,
    pub status: String,
    pub is_pending: bool,
    pub joined_str: String,
    pub last_login_str: String,
}

impl From<&UserAccount> for UserRowVm {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id.value(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            target_year: user
                .target_exam_year
                .map_or_else(|| "-".to_owned(), |y| y.to_string()),
            status: if user.is_active { "Active" } else { "Pending" }.to_owned(),
            is_pending: user.is_pending(),
            joined_str: format_datetime(user.created_at),
            last_login_str: user
                .last_login
                .map_or_else(|| "Never".to_owned(), format_datetime),
        }
    }
}

#[must_use]
pub fn map_user_rows(users: &[UserAccount]) -> Vec<UserRowVm> {
    users.iter().map(UserRowVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminLogVm {
    pub when: String,
    pub action: String,
    pub description: String,
}

#[must_use]
pub fn map_admin_logs(entries: &[AdminLogEntry]) -> Vec<AdminLogVm> {
    entries
        .iter()
        .map(|entry| AdminLogVm {
            when: format_datetime(entry.created_at),
            action: entry.action.as_str().to_owned(),
            description: entry.description.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagerVm {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[must_use]
pub fn pager_from(page: &UserPage) -> PagerVm {
    let href = |n: u32| format!("/admin/manage_users?page={n}");
    PagerVm {
        page: page.page,
        pages: page.pages(),
        total: page.total,
        prev_href: page.has_prev().then(|| href(page.page - 1)),
        next_href: page.has_next().then(|| href(page.page + 1)),
    }
}
