use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracker_core::model::{
    AdminLogEntry, AdminLogId, Chapter, ChapterFlags, ChapterId, Confidence, PomodoroDay,
    PomodoroDayId, RevisionId, RevisionLog, StudyLog, StudyLogId, Subject, SubjectMarks,
    TestScore, TestScoreId, UserAccount, UserId,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Unique violations become `Conflict`; a missing parent row becomes `NotFound`.
pub(crate) fn db(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StorageError::Conflict,
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StorageError::NotFound
        }
        sqlx::Error::RowNotFound => StorageError::NotFound,
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

/// Id for a lookup by primary key. Rowids never exceed `i64::MAX`, so a
/// larger id names no row.
pub(crate) fn lookup_id(v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::NotFound)
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn opt_u32(row: &SqliteRow, field: &'static str) -> Result<Option<u32>, StorageError> {
    row.try_get::<Option<i64>, _>(field)
        .map_err(ser)?
        .map(|v| i64_to_u32(field, v))
        .transpose()
}

fn opt_subject(row: &SqliteRow, field: &'static str) -> Result<Option<Subject>, StorageError> {
    row.try_get::<Option<String>, _>(field)
        .map_err(ser)?
        .map(|s| s.parse::<Subject>().map_err(ser))
        .transpose()
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn map_user_row(row: &SqliteRow) -> Result<UserAccount, StorageError> {
    let target_exam_year = row
        .try_get::<Option<i64>, _>("target_exam_year")
        .map_err(ser)?
        .map(|y| u16::try_from(y).map_err(ser))
        .transpose()?;
    Ok(UserAccount {
        id: user_id_from_i64(row.try_get("id").map_err(ser)?)?,
        username: row.try_get("username").map_err(ser)?,
        email: row.try_get("email").map_err(ser)?,
        password_hash: row.try_get("password_hash").map_err(ser)?,
        full_name: row.try_get("full_name").map_err(ser)?,
        target_exam_year,
        is_active: row.try_get("is_active").map_err(ser)?,
        is_admin: row.try_get("is_admin").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        last_login: row.try_get("last_login").map_err(ser)?,
        approved_at: row.try_get("approved_at").map_err(ser)?,
        approved_by: row
            .try_get::<Option<i64>, _>("approved_by")
            .map_err(ser)?
            .map(user_id_from_i64)
            .transpose()?,
    })
}

pub(crate) fn map_chapter_row(row: &SqliteRow) -> Result<Chapter, StorageError> {
    let subject: String = row.try_get("subject").map_err(ser)?;
    let flags = ChapterFlags {
        ncert_read: row.try_get("ncert_read").map_err(ser)?,
        lecture_watched: row.try_get("lecture_watched").map_err(ser)?,
        questions_solved: row.try_get("questions_solved").map_err(ser)?,
        revised: row.try_get("revised").map_err(ser)?,
    };
    Chapter::from_persisted(
        ChapterId::new(i64_to_u64("chapter_id", row.try_get("id").map_err(ser)?)?),
        user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        subject.parse().map_err(ser)?,
        row.try_get("chapter_name").map_err(ser)?,
        i64_to_u32("chapter_order", row.try_get("chapter_order").map_err(ser)?)?,
        flags,
        i64_to_u32("revision_count", row.try_get("revision_count").map_err(ser)?)?,
        row.try_get("last_revised_at").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_revision_row(row: &SqliteRow) -> Result<RevisionLog, StorageError> {
    let confidence = row
        .try_get::<Option<i64>, _>("confidence_level")
        .map_err(ser)?
        .map(|v| {
            u8::try_from(v)
                .map_err(ser)
                .and_then(|v| Confidence::new(v).map_err(ser))
        })
        .transpose()?;
    Ok(RevisionLog {
        id: RevisionId::new(i64_to_u64("revision_id", row.try_get("id").map_err(ser)?)?),
        user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        chapter_id: ChapterId::new(i64_to_u64(
            "chapter_id",
            row.try_get("chapter_id").map_err(ser)?,
        )?),
        revised_at: row.try_get("revised_at").map_err(ser)?,
        revision_number: i64_to_u32(
            "revision_number",
            row.try_get("revision_number").map_err(ser)?,
        )?,
        confidence,
        notes: row.try_get("notes").map_err(ser)?,
    })
}

pub(crate) fn map_study_log_row(row: &SqliteRow) -> Result<StudyLog, StorageError> {
    Ok(StudyLog {
        id: StudyLogId::new(i64_to_u64("study_log_id", row.try_get("id").map_err(ser)?)?),
        user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        date: row.try_get("study_date").map_err(ser)?,
        subject: opt_subject(row, "subject")?,
        duration_minutes: i64_to_u32(
            "duration_minutes",
            row.try_get("duration_minutes").map_err(ser)?,
        )?,
        notes: row.try_get("notes").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_test_score_row(row: &SqliteRow) -> Result<TestScore, StorageError> {
    let test_type: String = row.try_get("test_type").map_err(ser)?;
    Ok(TestScore {
        id: TestScoreId::new(i64_to_u64("test_id", row.try_get("id").map_err(ser)?)?),
        user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        name: row.try_get("test_name").map_err(ser)?,
        date: row.try_get("test_date").map_err(ser)?,
        test_type: test_type.parse().map_err(ser)?,
        physics: SubjectMarks::new(
            opt_u32(row, "physics_score")?,
            opt_u32(row, "physics_total")?,
        ),
        chemistry: SubjectMarks::new(
            opt_u32(row, "chemistry_score")?,
            opt_u32(row, "chemistry_total")?,
        ),
        biology: SubjectMarks::new(
            opt_u32(row, "biology_score")?,
            opt_u32(row, "biology_total")?,
        ),
        total_score: i64_to_u32("total_score", row.try_get("total_score").map_err(ser)?)?,
        total_marks: i64_to_u32("total_marks", row.try_get("total_marks").map_err(ser)?)?,
        percentage: row.try_get("percentage").map_err(ser)?,
        notes: row.try_get("notes").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_pomodoro_row(row: &SqliteRow) -> Result<PomodoroDay, StorageError> {
    Ok(PomodoroDay {
        id: PomodoroDayId::new(i64_to_u64("pomodoro_id", row.try_get("id").map_err(ser)?)?),
        user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        date: row.try_get("session_date").map_err(ser)?,
        sessions_completed: i64_to_u32(
            "sessions_completed",
            row.try_get("sessions_completed").map_err(ser)?,
        )?,
        total_focus_minutes: i64_to_u32(
            "total_focus_minutes",
            row.try_get("total_focus_minutes").map_err(ser)?,
        )?,
        subject: opt_subject(row, "subject")?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_admin_log_row(row: &SqliteRow) -> Result<AdminLogEntry, StorageError> {
    let action: String = row.try_get("action").map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;
    Ok(AdminLogEntry {
        id: AdminLogId::new(i64_to_u64("admin_log_id", row.try_get("id").map_err(ser)?)?),
        admin_id: user_id_from_i64(row.try_get("admin_id").map_err(ser)?)?,
        target_user_id: row
            .try_get::<Option<i64>, _>("target_user_id")
            .map_err(ser)?
            .map(user_id_from_i64)
            .transpose()?,
        action: action.parse().map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        created_at,
    })
}

pub(crate) fn marks_i64(marks: SubjectMarks) -> (Option<i64>, Option<i64>) {
    (marks.score.map(i64::from), marks.total.map(i64::from))
}
