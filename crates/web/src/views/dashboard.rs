use dioxus::prelude::*;

use crate::scripts::{CHAPTER_SCRIPT, chart_script};
use crate::views::layout::{PageScript, ProgressBar, Shell, Stat, document};
use crate::vm::{BoardVm, ChapterRowVm, ChromeVm, SubjectVm, TestRowVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub greeting: String,
    pub board: BoardVm,
    pub week_hours: String,
    pub streak: u32,
    pub needing_revision: u64,
    pub pomodoro_today: u32,
    pub recent_tests: Vec<TestRowVm>,
}

#[must_use]
pub fn dashboard_page(chrome: ChromeVm, vm: DashboardVm) -> String {
    let study_chart = chart_script("/study_stats?days=30", "study-chart", "durations", " min");
    let test_chart = chart_script("/test_stats", "test-chart", "percentages", "%");
    document(
        "Dashboard",
        rsx! {
            Shell { chrome,
                h1 { "Welcome, {vm.greeting}" }
                div { class: "stats",
                    Stat { label: "Overall progress", value: vm.board.overall.percentage_str.clone() }
                    Stat { label: "Study hours (7 days)", value: vm.week_hours.clone() }
                    Stat { label: "Study streak (days)", value: vm.streak.to_string() }
                    Stat { label: "Chapters to revise", value: vm.needing_revision.to_string() }
                    Stat { label: "Pomodoros today", value: vm.pomodoro_today.to_string() }
                }
                SyllabusBoard { board: vm.board.clone(), editable: true }
                div { class: "card",
                    h2 { "Study time (30 days)" }
                    div { id: "study-chart", class: "chart" }
                }
                div { class: "card",
                    h2 { "Mock test trend" }
                    div { id: "test-chart", class: "chart" }
                }
                RecentTests { tests: vm.recent_tests.clone() }
                PageScript { source: CHAPTER_SCRIPT.to_owned() }
                PageScript { source: study_chart }
                PageScript { source: test_chart }
            }
        },
    )
}

/// Per-subject chapter tables. Checkboxes are disabled when read-only.
#[component]
pub fn SyllabusBoard(board: BoardVm, editable: bool) -> Element {
    rsx! {
        div { class: "card",
            h2 { "Syllabus progress" }
            p { "{board.overall.completed} of {board.overall.total} chapters complete ({board.overall.percentage_str})" }
            ProgressBar { style: board.overall.bar_style.clone() }
        }
        for subject in board.subjects.iter().cloned() {
            SubjectCard { key: "{subject.name}", subject, editable }
        }
    }
}

#[component]
fn SubjectCard(subject: SubjectVm, editable: bool) -> Element {
    rsx! {
        section { class: "card",
            h2 { "{subject.name} " span { class: "muted", "{subject.progress.percentage_str}" } }
            ProgressBar { style: subject.progress.bar_style.clone() }
            table {
                thead {
                    tr {
                        th { "Chapter" }
                        th { "NCERT" }
                        th { "Lecture" }
                        th { "Questions" }
                        th { "Revised" }
                        th { "Revisions" }
                    }
                }
                tbody {
                    for row in subject.chapters.iter().cloned() {
                        ChapterRow { key: "{row.id}", row, editable }
                    }
                }
            }
        }
    }
}

#[component]
fn ChapterRow(row: ChapterRowVm, editable: bool) -> Element {
    let class = if row.completed { "completed" } else { "" };
    let flags = [
        ("ncert_read", row.ncert_read),
        ("lecture_watched", row.lecture_watched),
        ("questions_solved", row.questions_solved),
        ("revised", row.revised),
    ];
    rsx! {
        tr { id: "chapter-{row.id}", class: "{class}",
            td { "{row.name}" }
            for (field, checked) in flags {
                td {
                    input {
                        class: "chapter-flag",
                        r#type: "checkbox",
                        "data-chapter": "{row.id}",
                        "data-field": "{field}",
                        checked,
                        disabled: !editable,
                    }
                }
            }
            td { "{row.revision_count}" }
        }
    }
}

#[component]
pub fn RecentTests(tests: Vec<TestRowVm>) -> Element {
    rsx! {
        div { class: "card",
            h2 { "Recent tests" }
            if tests.is_empty() {
                p { class: "muted", "No tests recorded yet." }
            } else {
                table {
                    thead {
                        tr { th { "Date" } th { "Test" } th { "Score" } th { "Percentage" } }
                    }
                    tbody {
                        for test in tests {
                            tr {
                                td { "{test.date_str}" }
                                td { "{test.name}" }
                                td { "{test.total}" }
                                td { "{test.percentage_str}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
