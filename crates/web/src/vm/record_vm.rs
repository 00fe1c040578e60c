use tracker_core::model::{PomodoroSettings, RevisionEntry, StudyLog, Subject, TestScore};

use crate::vm::time_fmt::{format_date, format_datetime};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyLogRowVm {
    pub date_str: String,
    pub subject: String,
    pub minutes: u32,
    pub notes: String,
}

#[must_use]
pub fn map_study_logs(logs: &[StudyLog]) -> Vec<StudyLogRowVm> {
    logs.iter()
        .map(|log| StudyLogRowVm {
            date_str: format_date(log.date),
            subject: log
                .subject
                .map_or_else(|| "All Subjects".to_owned(), |s| s.as_str().to_owned()),
            minutes: log.duration_minutes,
            notes: log.notes.clone().unwrap_or_default(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRowVm {
    pub name: String,
    pub date_str: String,
    pub test_type: String,
    pub physics: String,
    pub chemistry: String,
    pub biology: String,
    pub total: String,
    pub percentage_str: String,
    pub notes: String,
}

fn marks_label(test: &TestScore, subject: Subject) -> String {
    let marks = test.marks(subject);
    match (marks.score, marks.total) {
        (Some(score), Some(total)) => format!("{score}/{total}"),
        (Some(score), None) => score.to_string(),
        _ => "-".to_owned(),
    }
}

#[must_use]
pub fn map_tests(tests: &[TestScore]) -> Vec<TestRowVm> {
    tests
        .iter()
        .map(|test| TestRowVm {
            name: test.name.clone(),
            date_str: format_date(test.date),
            test_type: test.test_type.label().to_owned(),
            physics: marks_label(test, Subject::Physics),
            chemistry: marks_label(test, Subject::Chemistry),
            biology: marks_label(test, Subject::Biology),
            total: format!("{}/{}", test.total_score, test.total_marks),
            percentage_str: format!("{:.1}%", test.percentage),
            notes: test.notes.clone().unwrap_or_default(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionEntryVm {
    pub revised_str: String,
    pub subject: String,
    pub chapter: String,
    pub number: u32,
    pub confidence: String,
    pub notes: String,
}

#[must_use]
pub fn map_revision_entries(entries: &[RevisionEntry]) -> Vec<RevisionEntryVm> {
    entries
        .iter()
        .map(|entry| RevisionEntryVm {
            revised_str: format_datetime(entry.log.revised_at),
            subject: entry.subject.as_str().to_owned(),
            chapter: entry.chapter_name.clone(),
            number: entry.log.revision_number,
            confidence: entry
                .log
                .confidence
                .map_or_else(|| "-".to_owned(), |c| c.label().to_owned()),
            notes: entry.log.notes.clone().unwrap_or_default(),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PomodoroSettingsVm {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub cycles_before_long_break: u32,
}

impl From<PomodoroSettings> for PomodoroSettingsVm {
    fn from(settings: PomodoroSettings) -> Self {
        Self {
            work_minutes: settings.work_minutes(),
            short_break_minutes: settings.short_break_minutes(),
            long_break_minutes: settings.long_break_minutes(),
            cycles_before_long_break: settings.cycles_before_long_break(),
        }
    }
}
