use dioxus::prelude::*;

use crate::scripts::pomodoro_script;
use crate::views::layout::{PageScript, Shell, Stat, document};
use crate::views::records::SubjectSelect;
use crate::vm::{ChromeVm, PomodoroSettingsVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PomodoroVm {
    pub settings: PomodoroSettingsVm,
    pub sessions_today: u32,
    pub week_sessions: u32,
    pub week_hours: String,
}

#[must_use]
pub fn pomodoro_page(chrome: ChromeVm, vm: PomodoroVm) -> String {
    let script = pomodoro_script(vm.settings);
    let work = vm.settings.work_minutes;
    document(
        "Pomodoro",
        rsx! {
            Shell { chrome,
                h1 { "Pomodoro Timer" }
                section { class: "card",
                    div { id: "pomodoro-phase", class: "muted", "Focus" }
                    div { id: "pomodoro-clock", class: "pomodoro-clock", "{work:02}:00" }
                    p {
                        label { r#for: "pomodoro-subject", "Subject " }
                        SubjectSelect { name: "pomodoro-subject", selected: "", blank_label: "Any subject" }
                    }
                    p {
                        button { id: "pomodoro-start", r#type: "button", "Start" }
                        " "
                        button { id: "pomodoro-pause", class: "secondary", r#type: "button", "Pause" }
                        " "
                        button { id: "pomodoro-reset", class: "danger", r#type: "button", "Reset" }
                    }
                    p { class: "muted",
                        "{vm.settings.work_minutes} min focus, {vm.settings.short_break_minutes} min short break, "
                        "{vm.settings.long_break_minutes} min long break every {vm.settings.cycles_before_long_break} sessions."
                    }
                }
                div { class: "stats",
                    div { class: "card stat",
                        div { id: "pomodoro-today", class: "value", "{vm.sessions_today}" }
                        div { class: "label", "Completed today" }
                    }
                    Stat { label: "Sessions (7 days)", value: vm.week_sessions.to_string() }
                    Stat { label: "Focus hours (7 days)", value: vm.week_hours.clone() }
                }
                PageScript { source: script }
            }
        },
    )
}
