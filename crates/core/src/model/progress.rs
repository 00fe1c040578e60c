use serde::Serialize;

use crate::model::chapter::Chapter;
use crate::model::subject::Subject;

/// Round to the given number of decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Completed/total chapter counts with a percentage rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Progress {
    pub total: u32,
    pub completed: u32,
    pub percentage: f64,
}

impl Progress {
    #[must_use]
    pub fn new(completed: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            round_to(f64::from(completed) / f64::from(total) * 100.0, 1)
        };
        Self {
            total,
            completed,
            percentage,
        }
    }

    #[must_use]
    pub fn from_chapters<'a>(chapters: impl IntoIterator<Item = &'a Chapter>) -> Self {
        let (completed, total) = chapters.into_iter().fold((0_u32, 0_u32), |(done, all), ch| {
            (done + u32::from(ch.is_completed()), all + 1)
        });
        Self::new(completed, total)
    }
}

/// Overall progress plus one entry per subject in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyllabusProgress {
    pub overall: Progress,
    pub subjects: Vec<(Subject, Progress)>,
}

impl SyllabusProgress {
    #[must_use]
    pub fn from_chapters(chapters: &[Chapter]) -> Self {
        let subjects = Subject::ALL
            .into_iter()
            .map(|subject| {
                let progress =
                    Progress::from_chapters(chapters.iter().filter(|ch| ch.subject() == subject));
                (subject, progress)
            })
            .collect();
        Self {
            overall: Progress::from_chapters(chapters),
            subjects,
        }
    }

    #[must_use]
    pub fn subject(&self, subject: Subject) -> Progress {
        self.subjects
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, p)| *p)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChapterId, ChapterUpdate, NewChapter, UserId};
    use crate::time::fixed_now;

    fn chapter(id: u64, subject: Subject, done: bool) -> Chapter {
        let new = NewChapter::new(UserId::new(1), subject, format!("Ch {id}"), 1, fixed_now())
            .unwrap();
        let mut ch = Chapter::from_new(ChapterId::new(id), new);
        if done {
            ch.apply_update(
                ChapterUpdate {
                    ncert_read: Some(true),
                    lecture_watched: Some(true),
                    questions_solved: Some(true),
                    revised: Some(true),
                },
                fixed_now(),
            );
        }
        ch
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(Progress::new(1, 3).percentage, 33.3);
        assert_eq!(Progress::new(2, 3).percentage, 66.7);
        assert_eq!(Progress::new(0, 0).percentage, 0.0);
    }

    #[test]
    fn syllabus_progress_splits_by_subject() {
        let chapters = vec![
            chapter(1, Subject::Physics, true),
            chapter(2, Subject::Physics, false),
            chapter(3, Subject::Chemistry, true),
            chapter(4, Subject::Biology, false),
        ];
        let progress = SyllabusProgress::from_chapters(&chapters);
        assert_eq!(progress.overall.percentage, 50.0);
        assert_eq!(progress.subject(Subject::Physics).percentage, 50.0);
        assert_eq!(progress.subject(Subject::Chemistry).percentage, 100.0);
        assert_eq!(progress.subject(Subject::Biology).percentage, 0.0);
        assert_eq!(progress.subjects[0].0, Subject::Physics);
    }
}
