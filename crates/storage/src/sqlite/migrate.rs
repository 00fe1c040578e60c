use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            target_exam_year INTEGER,
            is_active INTEGER NOT NULL DEFAULT 0,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            last_login TEXT,
            approved_at TEXT,
            approved_by INTEGER REFERENCES users(id) ON DELETE SET NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS chapter_progress (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            subject TEXT NOT NULL,
            chapter_name TEXT NOT NULL,
            chapter_order INTEGER NOT NULL CHECK (chapter_order >= 1),
            ncert_read INTEGER NOT NULL DEFAULT 0,
            lecture_watched INTEGER NOT NULL DEFAULT 0,
            questions_solved INTEGER NOT NULL DEFAULT 0,
            revised INTEGER NOT NULL DEFAULT 0,
            revision_count INTEGER NOT NULL DEFAULT 0 CHECK (revision_count >= 0),
            last_revised_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, subject, chapter_name),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS revision_logs (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            chapter_id INTEGER NOT NULL,
            revised_at TEXT NOT NULL,
            revision_number INTEGER NOT NULL CHECK (revision_number >= 1),
            confidence_level INTEGER CHECK (confidence_level BETWEEN 1 AND 5),
            notes TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (chapter_id) REFERENCES chapter_progress(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS study_logs (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            study_date TEXT NOT NULL,
            subject TEXT,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes BETWEEN 1 AND 1440),
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS test_scores (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            test_name TEXT NOT NULL,
            test_date TEXT NOT NULL,
            test_type TEXT NOT NULL,
            physics_score INTEGER,
            physics_total INTEGER,
            chemistry_score INTEGER,
            chemistry_total INTEGER,
            biology_score INTEGER,
            biology_total INTEGER,
            total_score INTEGER NOT NULL CHECK (total_score >= 0),
            total_marks INTEGER NOT NULL CHECK (total_marks > 0),
            percentage REAL NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS pomodoro_days (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            session_date TEXT NOT NULL,
            sessions_completed INTEGER NOT NULL DEFAULT 0 CHECK (sessions_completed >= 0),
            total_focus_minutes INTEGER NOT NULL DEFAULT 0 CHECK (total_focus_minutes >= 0),
            subject TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, session_date),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS admin_logs (
            id INTEGER PRIMARY KEY,
            admin_id INTEGER NOT NULL,
            target_user_id INTEGER,
            action TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (admin_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (target_user_id) REFERENCES users(id) ON DELETE SET NULL
        );
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_chapter_progress_user_subject_order
            ON chapter_progress (user_id, subject, chapter_order);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_revision_logs_user_revised_at
            ON revision_logs (user_id, revised_at);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_study_logs_user_date
            ON study_logs (user_id, study_date);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_test_scores_user_date
            ON test_scores (user_id, test_date);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_admin_logs_created_at
            ON admin_logs (created_at);
    ",
];

/// Runs the versioned schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1 {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
