use dioxus::prelude::*;

use crate::scripts::REVISION_SCRIPT;
use crate::views::layout::{PageScript, Shell, document};
use crate::vm::{ChapterRowVm, ChromeVm, RevisionEntryVm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionVm {
    pub reminder_days: u32,
    pub chapters: Vec<ChapterRowVm>,
    pub needing_revision: Vec<ChapterRowVm>,
    pub recent: Vec<RevisionEntryVm>,
}

#[must_use]
pub fn revision_page(chrome: ChromeVm, vm: RevisionVm) -> String {
    document(
        "Revision",
        rsx! {
            Shell { chrome,
                h1 { "Revision Tracker" }
                section { class: "card",
                    h2 { "Due for revision" }
                    p { class: "muted", "Revised chapters not touched for {vm.reminder_days} days or more." }
                    if vm.needing_revision.is_empty() {
                        p { "You're up to date." }
                    } else {
                        ul {
                            for chapter in vm.needing_revision.iter().cloned() {
                                li { "{chapter.subject}: {chapter.name} (last revised {chapter.last_revised_str})" }
                            }
                        }
                    }
                }
                section { class: "card",
                    h2 { "Chapters" }
                    table {
                        thead {
                            tr { th { "Subject" } th { "Chapter" } th { "Revisions" } th { "Last revised" } th { "Log revision" } }
                        }
                        tbody {
                            for chapter in vm.chapters.iter().cloned() {
                                RevisionRow { key: "{chapter.id}", chapter }
                            }
                        }
                    }
                }
                section { class: "card",
                    h2 { "Recent revisions" }
                    if vm.recent.is_empty() {
                        p { class: "muted", "No revisions logged yet." }
                    } else {
                        table {
                            thead {
                                tr { th { "When" } th { "Subject" } th { "Chapter" } th { "#" } th { "Confidence" } th { "Notes" } }
                            }
                            tbody {
                                for entry in vm.recent.iter().cloned() {
                                    tr {
                                        td { "{entry.revised_str}" }
                                        td { "{entry.subject}" }
                                        td { "{entry.chapter}" }
                                        td { "{entry.number}" }
                                        td { "{entry.confidence}" }
                                        td { "{entry.notes}" }
                                    }
                                }
                            }
                        }
                    }
                }
                PageScript { source: REVISION_SCRIPT.to_owned() }
            }
        },
    )
}

#[component]
fn RevisionRow(chapter: ChapterRowVm) -> Element {
    rsx! {
        tr {
            td { "{chapter.subject}" }
            td { "{chapter.name}" }
            td { id: "revision-count-{chapter.id}", "{chapter.revision_count}" }
            td { id: "last-revised-{chapter.id}", "{chapter.last_revised_str}" }
            td {
                form { class: "revision-form inline", "data-chapter": "{chapter.id}",
                    select { name: "confidence_level",
                        option { value: "", "Confidence" }
                        option { value: "1", "1 - Very Low" }
                        option { value: "2", "2 - Low" }
                        option { value: "3", "3 - Medium" }
                        option { value: "4", "4 - High" }
                        option { value: "5", "5 - Very High" }
                    }
                    input { name: "notes", placeholder: "Notes", maxlength: "500" }
                    button { r#type: "submit", "Log" }
                }
            }
        }
    }
}
