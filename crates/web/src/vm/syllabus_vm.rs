use services::SyllabusBoard;
use tracker_core::model::{Chapter, Progress};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub completed: u32,
    pub total: u32,
    pub percentage_str: String,
    /// Inline style for the progress bar fill.
    pub bar_style: String,
}

impl From<Progress> for ProgressVm {
    fn from(progress: Progress) -> Self {
        Self {
            completed: progress.completed,
            total: progress.total,
            percentage_str: format!("{:.1}%", progress.percentage),
            bar_style: format!("width: {:.1}%", progress.percentage),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRowVm {
    pub id: u64,
    pub subject: String,
    pub name: String,
    pub ncert_read: bool,
    pub lecture_watched: bool,
    pub questions_solved: bool,
    pub revised: bool,
    pub completed: bool,
    pub revision_count: u32,
    pub last_revised_str: String,
}

impl From<&Chapter> for ChapterRowVm {
    fn from(chapter: &Chapter) -> Self {
        let flags = chapter.flags();
        Self {
            id: chapter.id().value(),
            subject: chapter.subject().as_str().to_owned(),
            name: chapter.name().to_owned(),
            ncert_read: flags.ncert_read,
            lecture_watched: flags.lecture_watched,
            questions_solved: flags.questions_solved,
            revised: flags.revised,
            completed: chapter.is_completed(),
            revision_count: chapter.revision_count(),
            last_revised_str: chapter
                .last_revised_at()
                .map_or_else(|| "Never".to_owned(), format_datetime),
        }
    }
}

#[must_use]
pub fn map_chapters(chapters: &[Chapter]) -> Vec<ChapterRowVm> {
    chapters.iter().map(ChapterRowVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectVm {
    pub name: String,
    pub progress: ProgressVm,
    pub chapters: Vec<ChapterRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardVm {
    pub overall: ProgressVm,
    pub subjects: Vec<SubjectVm>,
}

#[must_use]
pub fn map_board(board: &SyllabusBoard) -> BoardVm {
    BoardVm {
        overall: board.overall.into(),
        subjects: board
            .subjects
            .iter()
            .map(|subject| SubjectVm {
                name: subject.subject.as_str().to_owned(),
                progress: subject.progress.into(),
                chapters: map_chapters(&subject.chapters),
            })
            .collect(),
    }
}
