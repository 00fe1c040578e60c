use dioxus::prelude::*;

use crate::scripts::BASE_SCRIPT;
use crate::vm::{ChromeVm, FlashVm, NavVm};

const STYLES: &str = r"
:root { --accent: #4f46e5; --ok: #16a34a; --warn: #d97706; --bad: #dc2626; --muted: #6b7280; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: #f5f6fa; color: #1f2937; }
a { color: var(--accent); }
.topbar { display: flex; align-items: center; gap: 1rem; padding: 0.75rem 1.5rem; background: #111827; color: #fff; }
.topbar a { color: #e5e7eb; text-decoration: none; }
.topbar .brand { font-weight: 700; margin-right: auto; }
main { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; }
.stat .value { font-size: 1.6rem; font-weight: 700; }
.stat .label { color: var(--muted); font-size: .9rem; }
.progress { background: #e5e7eb; border-radius: 4px; height: 10px; overflow: hidden; }
.progress .fill { background: var(--accent); height: 100%; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: .4rem .5rem; border-bottom: 1px solid #e5e7eb; font-size: .92rem; }
tr.completed td { background: #ecfdf5; }
form.stacked label { display: block; margin-top: .6rem; font-weight: 600; }
form.stacked input, form.stacked select, form.stacked textarea { width: 100%; padding: .45rem; margin-top: .2rem; }
.grid-3 { display: grid; grid-template-columns: repeat(3, 1fr); gap: .75rem; }
button, .button { background: var(--accent); color: #fff; border: 0; border-radius: 6px; padding: .5rem 1rem; cursor: pointer; text-decoration: none; }
button.danger { background: var(--bad); }
button.secondary { background: var(--muted); }
.inline { display: inline; }
.flash { padding: .6rem 1rem; border-radius: 6px; margin-bottom: .75rem; transition: opacity .5s; }
.flash.fade { opacity: 0; }
.flash-success { background: #dcfce7; } .flash-info { background: #dbeafe; }
.flash-warning { background: #fef3c7; } .flash-danger { background: #fee2e2; }
.errors { color: var(--bad); }
.chart { display: flex; align-items: flex-end; gap: 3px; height: 140px; }
.chart .bar { flex: 1; background: var(--accent); min-height: 2px; border-radius: 2px 2px 0 0; }
#toast-host { position: fixed; right: 1rem; bottom: 1rem; display: flex; flex-direction: column; gap: .5rem; }
.toast { padding: .6rem 1rem; border-radius: 6px; color: #fff; background: #374151; }
.toast-success { background: var(--ok); } .toast-danger { background: var(--bad); }
.pomodoro-clock { font-size: 4rem; font-weight: 700; text-align: center; font-variant-numeric: tabular-nums; }
.muted { color: var(--muted); }
";

/// Wrap a rendered body in the HTML document.
#[must_use]
pub fn document(title: &str, body: Element) -> String {
    let body = dioxus_ssr::render_element(body);
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} | NEET Study Tracker</title><style>{STYLES}</style></head>\
         <body>{body}<script>{BASE_SCRIPT}</script></body></html>"
    )
}

#[component]
pub fn Shell(chrome: ChromeVm, children: Element) -> Element {
    rsx! {
        TopBar { account: chrome.nav.clone() }
        main {
            for flash in chrome.flashes.iter().cloned() {
                FlashBanner { flash }
            }
            {children}
        }
    }
}

#[component]
fn TopBar(account: Option<NavVm>) -> Element {
    rsx! {
        nav { class: "topbar",
            a { class: "brand", href: "/", "NEET Study Tracker" }
            match account {
                Some(nav) if nav.is_admin => rsx! {
                    a { href: "/admin/dashboard", "Admin" }
                    a { href: "/admin/pending_users", "Pending" }
                    a { href: "/admin/manage_users", "Users" }
                    a { href: "/dashboard", "Tracker" }
                    span { "{nav.display_name}" }
                    a { href: "/logout", "Logout" }
                },
                Some(nav) => rsx! {
                    a { href: "/dashboard", "Dashboard" }
                    a { href: "/study_log", "Study Log" }
                    a { href: "/test_tracker", "Tests" }
                    a { href: "/revision", "Revision" }
                    a { href: "/pomodoro", "Pomodoro" }
                    span { "{nav.display_name}" }
                    a { href: "/logout", "Logout" }
                },
                None => rsx! {
                    a { href: "/login", "Login" }
                    a { href: "/register", "Register" }
                },
            }
        }
    }
}

#[component]
fn FlashBanner(flash: FlashVm) -> Element {
    rsx! {
        div { class: "{flash.class}", "{flash.message}" }
    }
}

#[component]
pub fn ErrorList(errors: Vec<String>) -> Element {
    rsx! {
        if !errors.is_empty() {
            ul { class: "errors",
                for error in errors {
                    li { "{error}" }
                }
            }
        }
    }
}

#[component]
pub fn ProgressBar(style: String) -> Element {
    rsx! {
        div { class: "progress",
            div { class: "fill", style: "{style}" }
        }
    }
}

#[component]
pub fn Stat(label: String, value: String) -> Element {
    rsx! {
        div { class: "card stat",
            div { class: "value", "{value}" }
            div { class: "label", "{label}" }
        }
    }
}

#[component]
pub fn PageScript(source: String) -> Element {
    rsx! {
        script { dangerous_inner_html: "{source}" }
    }
}

#[must_use]
pub fn not_found_page() -> String {
    document(
        "Page Not Found",
        rsx! {
            Shell { chrome: ChromeVm::default(),
                div { class: "card",
                    h1 { "404" }
                    p { "The page you are looking for does not exist." }
                    a { class: "button", href: "/", "Back to home" }
                }
            }
        },
    )
}

#[must_use]
pub fn server_error_page() -> String {
    document(
        "Server Error",
        rsx! {
            Shell { chrome: ChromeVm::default(),
                div { class: "card",
                    h1 { "500" }
                    p { "Something went wrong. Please try again." }
                    a { class: "button", href: "/", "Back to home" }
                }
            }
        },
    )
}
