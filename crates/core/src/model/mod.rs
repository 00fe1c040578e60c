mod admin_log;
mod chapter;
mod ids;
mod pomodoro;
mod progress;
mod revision;
mod study_log;
mod subject;
mod test_score;
mod user;

pub use ids::{
    AdminLogId, ChapterId, ParseIdError, PomodoroDayId, RevisionId, StudyLogId, TestScoreId,
    UserId,
};

pub use admin_log::{AdminAction, AdminLogEntry, NewAdminLog, UnknownAdminAction};
pub use chapter::{Chapter, ChapterError, ChapterFlags, ChapterUpdate, NewChapter};
pub use pomodoro::{PomodoroCompletion, PomodoroDay, PomodoroSettings, PomodoroSettingsError};
pub use progress::{Progress, SyllabusProgress, round_to};
pub use revision::{
    Confidence, NewRevision, RevisionDraft, RevisionEntry, RevisionError, RevisionLog,
    ValidRevision,
};
pub use study_log::{
    MAX_STREAK_DAYS, NewStudyLog, StudyLog, StudyLogDraft, StudyLogError, StudyTotals,
    minutes_to_hours, study_streak,
};
pub use subject::{Subject, UnknownSubject};
pub use test_score::{
    NewTestScore, SubjectMarks, TestScore, TestScoreDraft, TestScoreError, TestType,
    score_percentage,
};
pub use user::{RegistrationDraft, RegistrationError, UserAccount, ValidRegistration};
