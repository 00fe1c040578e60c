use dioxus::prelude::*;

use crate::forms::{LoginForm, RegisterForm};
use crate::views::layout::{ErrorList, Shell, document};
use crate::vm::ChromeVm;

#[must_use]
pub fn landing_page(chrome: ChromeVm) -> String {
    let signed_in = chrome.nav.is_some();
    document(
        "Welcome",
        rsx! {
            Shell { chrome,
                section { class: "card",
                    h1 { "Track your NEET preparation" }
                    p {
                        "Tick off every Physics, Chemistry and Biology chapter as you read NCERT, "
                        "watch lectures, solve questions and revise."
                    }
                    ul {
                        li { "Syllabus board with per-subject progress" }
                        li { "Daily study log with streaks" }
                        li { "Mock test scores and trends" }
                        li { "Spaced revision reminders" }
                        li { "Built-in Pomodoro timer" }
                    }
                    if signed_in {
                        a { class: "button", href: "/dashboard", "Go to dashboard" }
                    } else {
                        a { class: "button", href: "/register", "Create an account" }
                        " "
                        a { href: "/login", "Log in" }
                    }
                }
            }
        },
    )
}

/// Login form shared by the member and admin portals.
#[must_use]
pub fn login_page(chrome: ChromeVm, fields: LoginForm, errors: Vec<String>, admin: bool) -> String {
    let (title, action) = if admin {
        ("Admin Login", "/admin/login")
    } else {
        ("Login", "/login")
    };
    document(
        title,
        rsx! {
            Shell { chrome,
                section { class: "card",
                    h1 { "{title}" }
                    ErrorList { errors }
                    form { class: "stacked", method: "post", action: "{action}",
                        if let Some(next) = fields.next.clone() {
                            input { name: "next", r#type: "hidden", value: "{next}" }
                        }
                        label { r#for: "username", "Username" }
                        input { id: "username", name: "username", value: "{fields.username}", required: true }
                        label { r#for: "password", "Password" }
                        input { id: "password", name: "password", r#type: "password", required: true }
                        label {
                            input { name: "remember_me", r#type: "checkbox", value: "y", checked: fields.remember() }
                            " Remember me"
                        }
                        p { button { r#type: "submit", "Login" } }
                    }
                    if !admin {
                        p { "New here? " a { href: "/register", "Register" } }
                    }
                }
            }
        },
    )
}

#[must_use]
pub fn register_page(chrome: ChromeVm, fields: RegisterForm, errors: Vec<String>) -> String {
    document(
        "Register",
        rsx! {
            Shell { chrome,
                section { class: "card",
                    h1 { "Create your account" }
                    p { class: "muted", "New accounts are activated by an administrator." }
                    ErrorList { errors }
                    form { class: "stacked", method: "post", action: "/register",
                        label { r#for: "username", "Username" }
                        input { id: "username", name: "username", value: "{fields.username}", required: true }
                        label { r#for: "email", "Email" }
                        input { id: "email", name: "email", r#type: "email", value: "{fields.email}", required: true }
                        label { r#for: "full_name", "Full Name" }
                        input { id: "full_name", name: "full_name", value: "{fields.full_name}" }
                        label { r#for: "target_exam_year", "Target NEET Year" }
                        input { id: "target_exam_year", name: "target_exam_year", r#type: "number", min: "2024", max: "2030", value: "{fields.target_exam_year}" }
                        label { r#for: "password", "Password" }
                        input { id: "password", name: "password", r#type: "password", required: true }
                        label { r#for: "confirm_password", "Confirm Password" }
                        input { id: "confirm_password", name: "confirm_password", r#type: "password", required: true }
                        p { button { r#type: "submit", "Register" } }
                    }
                    p { "Already registered? " a { href: "/login", "Log in" } }
                }
            }
        },
    )
}
