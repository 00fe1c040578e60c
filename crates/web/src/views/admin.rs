use dioxus::prelude::*;

use crate::views::dashboard::{RecentTests, SyllabusBoard};
use crate::views::layout::{Shell, Stat, document};
use crate::vm::{AdminLogVm, BoardVm, ChromeVm, PagerVm, StudyLogRowVm, TestRowVm, UserRowVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminDashboardVm {
    pub total_users: u64,
    pub active_users: u64,
    pub pending_users: u64,
    pub recent_users: Vec<UserRowVm>,
    pub recent_actions: Vec<AdminLogVm>,
}

#[must_use]
pub fn admin_dashboard_page(chrome: ChromeVm, vm: AdminDashboardVm) -> String {
    document(
        "Admin Dashboard",
        rsx! {
            Shell { chrome,
                h1 { "Admin Dashboard" }
                div { class: "stats",
                    Stat { label: "Students", value: vm.total_users.to_string() }
                    Stat { label: "Active", value: vm.active_users.to_string() }
                    Stat { label: "Pending approval", value: vm.pending_users.to_string() }
                }
                if vm.pending_users > 0 {
                    p { a { class: "button", href: "/admin/pending_users", "Review pending registrations" } }
                }
                section { class: "card",
                    h2 { "Newest registrations" }
                    UserTable { users: vm.recent_users.clone(), actions: false }
                }
                section { class: "card",
                    h2 { "Recent admin actions" }
                    if vm.recent_actions.is_empty() {
                        p { class: "muted", "Nothing yet." }
                    } else {
                        table {
                            thead { tr { th { "When" } th { "Action" } th { "Description" } } }
                            tbody {
                                for entry in vm.recent_actions.iter().cloned() {
                                    tr {
                                        td { "{entry.when}" }
                                        td { "{entry.action}" }
                                        td { "{entry.description}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

#[must_use]
pub fn pending_users_page(chrome: ChromeVm, users: Vec<UserRowVm>) -> String {
    document(
        "Pending Users",
        rsx! {
            Shell { chrome,
                h1 { "Pending approvals" }
                section { class: "card",
                    if users.is_empty() {
                        p { class: "muted", "No registrations are waiting for approval." }
                    } else {
                        table {
                            thead {
                                tr { th { "Username" } th { "Email" } th { "Name" } th { "Target year" } th { "Registered" } th { "" } }
                            }
                            tbody {
                                for user in users.iter().cloned() {
                                    tr {
                                        td { "{user.username}" }
                                        td { "{user.email}" }
                                        td { "{user.full_name}" }
                                        td { "{user.target_year}" }
                                        td { "{user.joined_str}" }
                                        td {
                                            ActionButton { action: "/admin/approve_user/{user.id}", label: "Approve", class: "" }
                                            " "
                                            ActionButton { action: "/admin/reject_user/{user.id}", label: "Reject", class: "danger" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

#[must_use]
pub fn manage_users_page(chrome: ChromeVm, users: Vec<UserRowVm>, pager: PagerVm) -> String {
    document(
        "Manage Users",
        rsx! {
            Shell { chrome,
                h1 { "Manage users" }
                section { class: "card",
                    p { class: "muted", "{pager.total} students" }
                    UserTable { users, actions: true }
                    p {
                        if let Some(href) = pager.prev_href.clone() {
                            a { href: "{href}", "Previous" }
                            " "
                        }
                        span { "Page {pager.page} of {pager.pages.max(1)}" }
                        if let Some(href) = pager.next_href.clone() {
                            " "
                            a { href: "{href}", "Next" }
                        }
                    }
                }
            }
        },
    )
}

#[component]
fn UserTable(users: Vec<UserRowVm>, actions: bool) -> Element {
    rsx! {
        if users.is_empty() {
            p { class: "muted", "No students yet." }
        } else {
            table {
                thead {
                    tr {
                        th { "Username" } th { "Email" } th { "Status" } th { "Joined" } th { "Last login" }
                        if actions { th { "" } }
                    }
                }
                tbody {
                    for user in users {
                        tr {
                            td { "{user.username}" }
                            td { "{user.email}" }
                            td { "{user.status}" }
                            td { "{user.joined_str}" }
                            td { "{user.last_login_str}" }
                            if actions {
                                td {
                                    a { href: "/admin/view_user/{user.id}", "View" }
                                    " "
                                    if user.is_pending {
                                        ActionButton { action: "/admin/approve_user/{user.id}", label: "Approve", class: "" }
                                    } else {
                                        ActionButton { action: "/admin/deactivate_user/{user.id}", label: "Deactivate", class: "secondary" }
                                    }
                                    " "
                                    ActionButton { action: "/admin/delete_user/{user.id}", label: "Delete", class: "danger" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ActionButton(action: String, label: String, class: String) -> Element {
    rsx! {
        form { class: "inline", method: "post", action: "{action}",
            button { class: "{class}", r#type: "submit", "{label}" }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProgressVm {
    pub user: UserRowVm,
    pub board: BoardVm,
    pub recent_tests: Vec<TestRowVm>,
    pub recent_logs: Vec<StudyLogRowVm>,
}

#[must_use]
pub fn view_user_page(chrome: ChromeVm, vm: UserProgressVm) -> String {
    let title = format!("Progress: {}", vm.user.username);
    document(
        &title,
        rsx! {
            Shell { chrome,
                h1 { "{title}" }
                p { class: "muted",
                    "{vm.user.email} | target year {vm.user.target_year} | {vm.user.status} | joined {vm.user.joined_str}"
                }
                SyllabusBoard { board: vm.board.clone(), editable: false }
                RecentTests { tests: vm.recent_tests.clone() }
                section { class: "card",
                    h2 { "Recent study sessions" }
                    if vm.recent_logs.is_empty() {
                        p { class: "muted", "No study sessions logged yet." }
                    } else {
                        table {
                            thead { tr { th { "Date" } th { "Subject" } th { "Minutes" } } }
                            tbody {
                                for log in vm.recent_logs.iter().cloned() {
                                    tr {
                                        td { "{log.date_str}" }
                                        td { "{log.subject}" }
                                        td { "{log.minutes}" }
                                    }
                                }
                            }
                        }
                    }
                }
                p { a { href: "/admin/manage_users", "Back to users" } }
            }
        },
    )
}
