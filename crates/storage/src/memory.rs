use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracker_core::model::{
    AdminLogEntry, AdminLogId, Chapter, ChapterId, NewAdminLog, NewChapter, NewRevision,
    NewStudyLog, NewTestScore, PomodoroCompletion, PomodoroDay, PomodoroDayId, RevisionEntry,
    RevisionId, RevisionLog, StudyLog, StudyLogId, StudyTotals, TestScore, TestScoreId,
    UserAccount, UserId,
};

use crate::repository::{
    AdminLogRepository, ChapterRepository, NewUser, PomodoroRepository, RevisionRepository,
    StorageError, StudyLogRepository, TestScoreRepository, UserFilter, UserRepository,
};

#[derive(Default)]
struct Tables {
    next_id: u64,
    users: BTreeMap<UserId, UserAccount>,
    chapters: BTreeMap<ChapterId, Chapter>,
    revisions: BTreeMap<RevisionId, RevisionLog>,
    study_logs: BTreeMap<StudyLogId, StudyLog>,
    tests: BTreeMap<TestScoreId, TestScore>,
    pomodoro: BTreeMap<PomodoroDayId, PomodoroDay>,
    admin_logs: BTreeMap<AdminLogId, AdminLogEntry>,
}

impl Tables {
    // Shared sequence across tables; ids only need to be unique and increasing.
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn take_limit<T>(items: impl Iterator<Item = T>, limit: u32) -> Vec<T> {
    items.take(limit as usize).collect()
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StorageError> {
        let mut t = self.lock()?;
        let taken = t.users.values().any(|u| {
            u.username == user.username || u.email.eq_ignore_ascii_case(&user.email)
        });
        if taken {
            return Err(StorageError::Conflict);
        }
        let id = UserId::new(t.allocate());
        let account = user.into_account(id);
        t.users.insert(id, account.clone());
        Ok(account)
    }

    async fn get_user(&self, id: UserId) -> Result<UserAccount, StorageError> {
        self.lock()?.users.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, StorageError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, user: &UserAccount) -> Result<(), StorageError> {
        let mut t = self.lock()?;
        let slot = t.users.get_mut(&user.id).ok_or(StorageError::NotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StorageError> {
        let mut t = self.lock()?;
        if t.users.remove(&id).is_none() {
            return Err(StorageError::NotFound);
        }
        t.chapters.retain(|_, c| c.user_id() != id);
        t.revisions.retain(|_, r| r.user_id != id);
        t.study_logs.retain(|_, l| l.user_id != id);
        t.tests.retain(|_, s| s.user_id != id);
        t.pomodoro.retain(|_, p| p.user_id != id);
        for entry in t.admin_logs.values_mut() {
            if entry.target_user_id == Some(id) {
                entry.target_user_id = None;
            }
        }
        for user in t.users.values_mut() {
            if user.approved_by == Some(id) {
                user.approved_by = None;
            }
        }
        Ok(())
    }

    async fn count_users(&self, filter: UserFilter) -> Result<u64, StorageError> {
        let t = self.lock()?;
        Ok(t.users.values().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<UserAccount>, StorageError> {
        let t = self.lock()?;
        let mut users: Vec<UserAccount> = t
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(take_limit(users.into_iter().skip(skip), limit))
    }
}

#[async_trait]
impl ChapterRepository for InMemoryRepository {
    async fn insert_chapters(&self, chapters: &[NewChapter]) -> Result<(), StorageError> {
        let mut t = self.lock()?;
        for new in chapters {
            let duplicate = t.chapters.values().any(|c| {
                c.user_id() == new.user_id && c.subject() == new.subject && c.name() == new.name
            });
            if duplicate {
                return Err(StorageError::Conflict);
            }
        }
        for new in chapters {
            let id = ChapterId::new(t.allocate());
            t.chapters.insert(id, Chapter::from_new(id, new.clone()));
        }
        Ok(())
    }

    async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, StorageError> {
        self.lock()?
            .chapters
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn chapters_for_user(&self, user_id: UserId) -> Result<Vec<Chapter>, StorageError> {
        let t = self.lock()?;
        let mut out: Vec<Chapter> = t
            .chapters
            .values()
            .filter(|c| c.user_id() == user_id)
            .cloned()
            .collect();
        out.sort_by_key(|c| (c.subject().rank(), c.order(), c.id()));
        Ok(out)
    }

    async fn update_chapter(&self, chapter: &Chapter) -> Result<(), StorageError> {
        let mut t = self.lock()?;
        let slot = t
            .chapters
            .get_mut(&chapter.id())
            .ok_or(StorageError::NotFound)?;
        *slot = chapter.clone();
        Ok(())
    }

    async fn count_needing_revision(
        &self,
        user_id: UserId,
        before: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let t = self.lock()?;
        Ok(t.chapters
            .values()
            .filter(|c| {
                c.user_id() == user_id
                    && c.flags().revised
                    && c.last_revised_at().is_some_and(|at| at < before)
            })
            .count() as u64)
    }
}

#[async_trait]
impl RevisionRepository for InMemoryRepository {
    async fn record_revision(
        &self,
        chapter: &Chapter,
        revision: NewRevision,
    ) -> Result<RevisionLog, StorageError> {
        if revision.chapter_id != chapter.id() || revision.user_id != chapter.user_id() {
            return Err(StorageError::Conflict);
        }
        let mut t = self.lock()?;
        let slot = t
            .chapters
            .get_mut(&chapter.id())
            .ok_or(StorageError::NotFound)?;
        *slot = chapter.clone();
        let id = RevisionId::new(t.allocate());
        let log = RevisionLog {
            id,
            user_id: revision.user_id,
            chapter_id: revision.chapter_id,
            revised_at: revision.revised_at,
            revision_number: revision.revision_number,
            confidence: revision.confidence,
            notes: revision.notes,
        };
        t.revisions.insert(id, log.clone());
        Ok(log)
    }

    async fn recent_revisions(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<RevisionEntry>, StorageError> {
        let t = self.lock()?;
        let mut logs: Vec<&RevisionLog> =
            t.revisions.values().filter(|r| r.user_id == user_id).collect();
        logs.sort_by(|a, b| b.revised_at.cmp(&a.revised_at).then(b.id.cmp(&a.id)));
        let mut out = Vec::new();
        for log in logs.into_iter().take(limit as usize) {
            let chapter = t.chapters.get(&log.chapter_id).ok_or(StorageError::NotFound)?;
            out.push(RevisionEntry {
                log: log.clone(),
                subject: chapter.subject(),
                chapter_name: chapter.name().to_owned(),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl StudyLogRepository for InMemoryRepository {
    async fn insert_log(&self, log: NewStudyLog) -> Result<StudyLog, StorageError> {
        let mut t = self.lock()?;
        if !t.users.contains_key(&log.user_id) {
            return Err(StorageError::NotFound);
        }
        let id = StudyLogId::new(t.allocate());
        let stored = StudyLog::from_new(id, log);
        t.study_logs.insert(id, stored.clone());
        Ok(stored)
    }

    async fn recent_logs(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<StudyLog>, StorageError> {
        let t = self.lock()?;
        let mut logs: Vec<StudyLog> = t
            .study_logs
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(take_limit(logs.into_iter(), limit))
    }

    async fn logs_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<StudyLog>, StorageError> {
        let t = self.lock()?;
        let mut logs: Vec<StudyLog> = t
            .study_logs
            .values()
            .filter(|l| l.user_id == user_id && l.date >= since)
            .cloned()
            .collect();
        logs.sort_by_key(|l| (l.date, l.id));
        Ok(logs)
    }

    async fn totals(&self, user_id: UserId) -> Result<StudyTotals, StorageError> {
        let t = self.lock()?;
        Ok(t.study_logs
            .values()
            .filter(|l| l.user_id == user_id)
            .fold(StudyTotals::default(), |acc, l| StudyTotals {
                total_minutes: acc.total_minutes + u64::from(l.duration_minutes),
                sessions: acc.sessions + 1,
            }))
    }

    async fn minutes_since(&self, user_id: UserId, since: NaiveDate) -> Result<u64, StorageError> {
        let t = self.lock()?;
        Ok(t.study_logs
            .values()
            .filter(|l| l.user_id == user_id && l.date >= since)
            .map(|l| u64::from(l.duration_minutes))
            .sum())
    }

    async fn study_dates(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<NaiveDate>, StorageError> {
        let t = self.lock()?;
        let mut dates: Vec<NaiveDate> = t
            .study_logs
            .values()
            .filter(|l| l.user_id == user_id && l.date >= since)
            .map(|l| l.date)
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        Ok(dates)
    }
}

#[async_trait]
impl TestScoreRepository for InMemoryRepository {
    async fn insert_test(&self, test: NewTestScore) -> Result<TestScore, StorageError> {
        let mut t = self.lock()?;
        if !t.users.contains_key(&test.user_id) {
            return Err(StorageError::NotFound);
        }
        let id = TestScoreId::new(t.allocate());
        let stored = TestScore::from_new(id, test);
        t.tests.insert(id, stored.clone());
        Ok(stored)
    }

    async fn tests_for_user(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<TestScore>, StorageError> {
        let t = self.lock()?;
        let mut tests: Vec<TestScore> = t
            .tests
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        tests.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(match limit {
            Some(limit) => take_limit(tests.into_iter(), limit),
            None => tests,
        })
    }
}

#[async_trait]
impl PomodoroRepository for InMemoryRepository {
    async fn record_completion(
        &self,
        completion: PomodoroCompletion,
    ) -> Result<PomodoroDay, StorageError> {
        let mut t = self.lock()?;
        if !t.users.contains_key(&completion.user_id) {
            return Err(StorageError::NotFound);
        }
        if let Some(day) = t
            .pomodoro
            .values_mut()
            .find(|p| p.user_id == completion.user_id && p.date == completion.date)
        {
            day.absorb(&completion);
            return Ok(day.clone());
        }
        let id = PomodoroDayId::new(t.allocate());
        let day = PomodoroDay {
            id,
            user_id: completion.user_id,
            date: completion.date,
            sessions_completed: 1,
            total_focus_minutes: completion.focus_minutes,
            subject: completion.subject,
            created_at: completion.completed_at,
        };
        t.pomodoro.insert(id, day.clone());
        Ok(day)
    }

    async fn day(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<PomodoroDay>, StorageError> {
        Ok(self
            .lock()?
            .pomodoro
            .values()
            .find(|p| p.user_id == user_id && p.date == date)
            .cloned())
    }

    async fn days_since(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<PomodoroDay>, StorageError> {
        let t = self.lock()?;
        let mut days: Vec<PomodoroDay> = t
            .pomodoro
            .values()
            .filter(|p| p.user_id == user_id && p.date >= since)
            .cloned()
            .collect();
        days.sort_by_key(|p| p.date);
        Ok(days)
    }
}

#[async_trait]
impl AdminLogRepository for InMemoryRepository {
    async fn append_admin_log(&self, entry: NewAdminLog) -> Result<AdminLogEntry, StorageError> {
        let mut t = self.lock()?;
        let id = AdminLogId::new(t.allocate());
        let stored = AdminLogEntry::from_new(id, entry);
        t.admin_logs.insert(id, stored.clone());
        Ok(stored)
    }

    async fn recent_admin_logs(&self, limit: u32) -> Result<Vec<AdminLogEntry>, StorageError> {
        let t = self.lock()?;
        let mut logs: Vec<AdminLogEntry> = t.admin_logs.values().cloned().collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(take_limit(logs.into_iter(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tracker_core::model::{AdminAction, ChapterUpdate, Subject};
    use tracker_core::time::fixed_now;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
            email: format!("{name}@example.com"),
            password_hash: "hash".into(),
            full_name: None,
            target_exam_year: Some(2026),
            is_active: false,
            is_admin: false,
            created_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let repo = InMemoryRepository::new();
        repo.insert_user(new_user("asha")).await.unwrap();

        let err = repo.insert_user(new_user("asha")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let mut other = new_user("ravi");
        other.email = "ASHA@example.com".into();
        let err = repo.insert_user(other).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn delete_user_cascades_and_detaches_admin_logs() {
        let repo = InMemoryRepository::new();
        let admin = repo
            .insert_user(NewUser {
                is_admin: true,
                is_active: true,
                ..new_user("root")
            })
            .await
            .unwrap();
        let user = repo.insert_user(new_user("asha")).await.unwrap();
        let chapter = NewChapter::new(user.id, Subject::Physics, "Vectors", 1, fixed_now()).unwrap();
        repo.insert_chapters(&[chapter]).await.unwrap();
        repo.append_admin_log(NewAdminLog {
            admin_id: admin.id,
            target_user_id: Some(user.id),
            action: AdminAction::Approve,
            description: AdminAction::Approve.describe("asha"),
            created_at: fixed_now(),
        })
        .await
        .unwrap();

        repo.delete_user(user.id).await.unwrap();

        assert!(repo.chapters_for_user(user.id).await.unwrap().is_empty());
        let logs = repo.recent_admin_logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].target_user_id, None);
        assert!(matches!(
            repo.delete_user(user.id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn pomodoro_completions_accumulate_per_day() {
        let repo = InMemoryRepository::new();
        let user = repo.insert_user(new_user("asha")).await.unwrap();
        let today = fixed_now().date_naive();
        let completion = PomodoroCompletion {
            user_id: user.id,
            date: today,
            focus_minutes: 25,
            subject: Some(Subject::Biology),
            completed_at: fixed_now(),
        };
        repo.record_completion(completion).await.unwrap();
        let day = repo.record_completion(completion).await.unwrap();
        assert_eq!(day.sessions_completed, 2);
        assert_eq!(day.total_focus_minutes, 50);

        let next = PomodoroCompletion {
            date: today + Duration::days(1),
            ..completion
        };
        repo.record_completion(next).await.unwrap();
        assert_eq!(repo.days_since(user.id, today).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn needing_revision_counts_only_stale_revised_chapters() {
        let repo = InMemoryRepository::new();
        let user = repo.insert_user(new_user("asha")).await.unwrap();
        let now = fixed_now();
        repo.insert_chapters(&[
            NewChapter::new(user.id, Subject::Chemistry, "Amines", 1, now).unwrap(),
            NewChapter::new(user.id, Subject::Chemistry, "IUPAC Nomenclature", 2, now).unwrap(),
        ])
        .await
        .unwrap();
        let mut chapters = repo.chapters_for_user(user.id).await.unwrap();
        chapters[0].apply_update(
            ChapterUpdate {
                revised: Some(true),
                ..ChapterUpdate::default()
            },
            now - Duration::days(10),
        );
        repo.update_chapter(&chapters[0]).await.unwrap();

        let threshold = now - Duration::days(7);
        assert_eq!(repo.count_needing_revision(user.id, threshold).await.unwrap(), 1);
        assert_eq!(
            repo.count_needing_revision(user.id, now - Duration::days(30))
                .await
                .unwrap(),
            0
        );
    }
}
