mod admin_vm;
mod chrome_vm;
mod record_vm;
mod syllabus_vm;
mod time_fmt;

pub use admin_vm::{
    AdminLogVm, PagerVm, UserRowVm, map_admin_logs, map_user_rows, pager_from,
};
pub use chrome_vm::{ChromeVm, FlashVm, NavVm};
pub use record_vm::{
    PomodoroSettingsVm, RevisionEntryVm, StudyLogRowVm, TestRowVm, map_revision_entries,
    map_study_logs, map_tests,
};
pub use syllabus_vm::{BoardVm, ChapterRowVm, ProgressVm, SubjectVm, map_board, map_chapters};
pub use time_fmt::{format_date, format_datetime, format_hours};
