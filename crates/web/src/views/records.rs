use dioxus::prelude::*;
use tracker_core::model::{Subject, TestType};

use crate::forms::{StudyLogForm, TestScoreForm};
use crate::scripts::chart_script;
use crate::views::layout::{ErrorList, PageScript, Shell, Stat, document};
use crate::vm::{ChromeVm, StudyLogRowVm, TestRowVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyLogVm {
    pub form: StudyLogForm,
    pub errors: Vec<String>,
    pub logs: Vec<StudyLogRowVm>,
    pub total_hours: String,
    pub average_hours: String,
}

#[must_use]
pub fn study_log_page(chrome: ChromeVm, vm: StudyLogVm) -> String {
    let chart = chart_script("/study_stats?days=30", "study-chart", "durations", " min");
    document(
        "Study Log",
        rsx! {
            Shell { chrome,
                h1 { "Study Log" }
                div { class: "stats",
                    Stat { label: "Total hours", value: vm.total_hours.clone() }
                    Stat { label: "Average per session (hours)", value: vm.average_hours.clone() }
                }
                section { class: "card",
                    h2 { "Log a study session" }
                    ErrorList { errors: vm.errors.clone() }
                    form { class: "stacked", method: "post", action: "/study_log",
                        label { r#for: "date", "Date" }
                        input { id: "date", name: "date", r#type: "date", value: "{vm.form.date}", required: true }
                        label { r#for: "subject", "Subject (Optional)" }
                        SubjectSelect { name: "subject", selected: vm.form.subject.clone(), blank_label: "All Subjects" }
                        label { r#for: "duration_minutes", "Duration (minutes)" }
                        input { id: "duration_minutes", name: "duration_minutes", r#type: "number", min: "1", max: "1440", value: "{vm.form.duration_minutes}", required: true }
                        label { r#for: "notes", "Notes (Optional)" }
                        textarea { id: "notes", name: "notes", maxlength: "500", rows: "3", "{vm.form.notes}" }
                        p { button { r#type: "submit", "Log Study Session" } }
                    }
                }
                div { class: "card",
                    h2 { "Last 30 days" }
                    div { id: "study-chart", class: "chart" }
                }
                section { class: "card",
                    h2 { "Recent sessions" }
                    if vm.logs.is_empty() {
                        p { class: "muted", "No study sessions logged yet." }
                    } else {
                        table {
                            thead { tr { th { "Date" } th { "Subject" } th { "Minutes" } th { "Notes" } } }
                            tbody {
                                for log in vm.logs.iter().cloned() {
                                    tr {
                                        td { "{log.date_str}" }
                                        td { "{log.subject}" }
                                        td { "{log.minutes}" }
                                        td { "{log.notes}" }
                                    }
                                }
                            }
                        }
                    }
                }
                PageScript { source: chart }
            }
        },
    )
}

#[component]
pub fn SubjectSelect(name: String, selected: String, blank_label: String) -> Element {
    rsx! {
        select { id: "{name}", name: "{name}",
            option { value: "", selected: selected.is_empty(), "{blank_label}" }
            for subject in Subject::ALL {
                option {
                    value: "{subject.as_str()}",
                    selected: selected == subject.as_str(),
                    "{subject.as_str()}"
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestTrackerVm {
    pub form: TestScoreForm,
    pub errors: Vec<String>,
    pub tests: Vec<TestRowVm>,
}

#[must_use]
pub fn test_tracker_page(chrome: ChromeVm, vm: TestTrackerVm) -> String {
    let chart = chart_script("/test_stats", "test-chart", "percentages", "%");
    let fields = vm.form.clone();
    document(
        "Test Tracker",
        rsx! {
            Shell { chrome,
                h1 { "Mock Test Tracker" }
                section { class: "card",
                    h2 { "Add a test score" }
                    ErrorList { errors: vm.errors.clone() }
                    form { class: "stacked", method: "post", action: "/test_tracker",
                        label { r#for: "test_name", "Test Name" }
                        input { id: "test_name", name: "test_name", maxlength: "256", value: "{fields.test_name}", required: true }
                        label { r#for: "test_date", "Test Date" }
                        input { id: "test_date", name: "test_date", r#type: "date", value: "{fields.test_date}", required: true }
                        label { r#for: "test_type", "Test Type" }
                        select { id: "test_type", name: "test_type",
                            for kind in TestType::ALL {
                                option {
                                    value: "{kind.as_str()}",
                                    selected: fields.test_type == kind.as_str(),
                                    "{kind.label()}"
                                }
                            }
                        }
                        div { class: "grid-3",
                            MarksInput { subject: "Physics", score_name: "physics_score", score: fields.physics_score.clone(), total_name: "physics_total", total: fields.physics_total.clone() }
                            MarksInput { subject: "Chemistry", score_name: "chemistry_score", score: fields.chemistry_score.clone(), total_name: "chemistry_total", total: fields.chemistry_total.clone() }
                            MarksInput { subject: "Biology", score_name: "biology_score", score: fields.biology_score.clone(), total_name: "biology_total", total: fields.biology_total.clone() }
                        }
                        label { r#for: "total_score", "Total Score Obtained" }
                        input { id: "total_score", name: "total_score", r#type: "number", min: "0", max: "2000", value: "{fields.total_score}", required: true }
                        label { r#for: "total_marks", "Total Marks" }
                        input { id: "total_marks", name: "total_marks", r#type: "number", min: "1", max: "2000", value: "{fields.total_marks}", required: true }
                        label { r#for: "notes", "Analysis Notes (Optional)" }
                        textarea { id: "notes", name: "notes", maxlength: "1000", rows: "3", "{fields.notes}" }
                        p { button { r#type: "submit", "Save Test Score" } }
                    }
                }
                div { class: "card",
                    h2 { "Percentage trend" }
                    div { id: "test-chart", class: "chart" }
                }
                section { class: "card",
                    h2 { "All tests" }
                    if vm.tests.is_empty() {
                        p { class: "muted", "No tests recorded yet." }
                    } else {
                        table {
                            thead {
                                tr {
                                    th { "Date" } th { "Test" } th { "Type" } th { "Physics" }
                                    th { "Chemistry" } th { "Biology" } th { "Total" } th { "%" }
                                }
                            }
                            tbody {
                                for test in vm.tests.iter().cloned() {
                                    tr {
                                        td { "{test.date_str}" }
                                        td { "{test.name}" }
                                        td { "{test.test_type}" }
                                        td { "{test.physics}" }
                                        td { "{test.chemistry}" }
                                        td { "{test.biology}" }
                                        td { "{test.total}" }
                                        td { "{test.percentage_str}" }
                                    }
                                }
                            }
                        }
                    }
                }
                PageScript { source: chart }
            }
        },
    )
}

#[component]
fn MarksInput(
    subject: String,
    score_name: String,
    score: String,
    total_name: String,
    total: String,
) -> Element {
    rsx! {
        div {
            label { r#for: "{score_name}", "{subject} Score" }
            input { id: "{score_name}", name: "{score_name}", r#type: "number", min: "0", max: "1000", value: "{score}" }
            label { r#for: "{total_name}", "{subject} Total Marks" }
            input { id: "{total_name}", name: "{total_name}", r#type: "number", min: "1", max: "1000", value: "{total}" }
        }
    }
}
