//! Raw form posts and their conversion into domain drafts.
//!
//! Fields arrive as strings so a bad number re-renders the form with a
//! message instead of rejecting the request.

use chrono::NaiveDate;
use serde::Deserialize;
use tracker_core::model::{
    RegistrationDraft, StudyLogDraft, Subject, SubjectMarks, TestScoreDraft, TestType,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<String>,
    /// Page to return to after login.
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn remember(&self) -> bool {
        self.remember_me.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// # Errors
    ///
    /// Returns a message when either field is blank.
    pub fn check(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Username and password are required.".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub target_exam_year: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns a message when the exam year is not a number.
    pub fn to_draft(&self) -> Result<RegistrationDraft, String> {
        Ok(RegistrationDraft {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: non_empty(&self.full_name),
            target_exam_year: optional_number(&self.target_exam_year, "Please enter a valid year")?,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudyLogForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub duration_minutes: String,
    #[serde(default)]
    pub notes: String,
}

impl StudyLogForm {
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns a message for an unparseable date, subject or duration.
    pub fn to_draft(&self) -> Result<StudyLogDraft, String> {
        Ok(StudyLogDraft {
            date: parse_date(&self.date)?,
            subject: Subject::parse_optional(&self.subject).map_err(|e| e.to_string())?,
            duration_minutes: self
                .duration_minutes
                .trim()
                .parse()
                .map_err(|_| "Duration must be between 1 and 1440 minutes".to_owned())?,
            notes: non_empty(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TestScoreForm {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub test_date: String,
    #[serde(default)]
    pub test_type: String,
    #[serde(default)]
    pub physics_score: String,
    #[serde(default)]
    pub physics_total: String,
    #[serde(default)]
    pub chemistry_score: String,
    #[serde(default)]
    pub chemistry_total: String,
    #[serde(default)]
    pub biology_score: String,
    #[serde(default)]
    pub biology_total: String,
    #[serde(default)]
    pub total_score: String,
    #[serde(default)]
    pub total_marks: String,
    #[serde(default)]
    pub notes: String,
}

impl TestScoreForm {
    /// Blank form with the full-length paper's mark split.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            test_date: date.format(DATE_FORMAT).to_string(),
            test_type: TestType::FullLength.as_str().to_owned(),
            physics_total: "180".to_owned(),
            chemistry_total: "180".to_owned(),
            biology_total: "360".to_owned(),
            total_marks: "720".to_owned(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns a message for the first field that does not parse.
    pub fn to_draft(&self) -> Result<TestScoreDraft, String> {
        let marks = |score: &str, total: &str, subject: Subject| {
            Ok::<_, String>(SubjectMarks::new(
                optional_number(score, &format!("{subject} score must be a number"))?,
                optional_number(total, &format!("{subject} total marks must be a number"))?,
            ))
        };
        Ok(TestScoreDraft {
            name: self.test_name.clone(),
            date: parse_date(&self.test_date)?,
            test_type: self.test_type.parse().map_err(|_| "Please choose a test type".to_owned())?,
            physics: marks(&self.physics_score, &self.physics_total, Subject::Physics)?,
            chemistry: marks(&self.chemistry_score, &self.chemistry_total, Subject::Chemistry)?,
            biology: marks(&self.biology_score, &self.biology_total, Subject::Biology)?,
            total_score: required_number(&self.total_score, "Total score is required")?,
            total_marks: required_number(&self.total_marks, "Total marks is required")?,
            notes: non_empty(&self.notes),
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| "Please enter a valid date".to_owned())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn optional_number<T: std::str::FromStr>(raw: &str, message: &str) -> Result<Option<T>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| message.to_owned())
}

fn required_number<T: std::str::FromStr>(raw: &str, message: &str) -> Result<T, String> {
    optional_number(raw, message)?.ok_or_else(|| message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_form_parses_into_draft() {
        let form = StudyLogForm {
            date: "2024-03-01".into(),
            subject: "Biology".into(),
            duration_minutes: " 90 ".into(),
            notes: "  ".into(),
        };
        let draft = form.to_draft().expect("valid");
        assert_eq!(draft.subject, Some(Subject::Biology));
        assert_eq!(draft.duration_minutes, 90);
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn study_form_reports_bad_duration() {
        let form = StudyLogForm {
            duration_minutes: "ninety".into(),
            ..StudyLogForm::for_date(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"))
        };
        let err = form.to_draft().expect_err("invalid");
        assert!(err.contains("Duration"));
    }

    #[test]
    fn blank_test_form_defaults_to_full_length_split() {
        let form = TestScoreForm::for_date(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
        assert_eq!(form.total_marks, "720");
        let err = form.to_draft().expect_err("missing name and score");
        assert_eq!(err, "Total score is required");
    }

    #[test]
    fn register_form_rejects_non_numeric_year() {
        let form = RegisterForm {
            target_exam_year: "next year".into(),
            ..RegisterForm::default()
        };
        assert_eq!(form.to_draft().expect_err("bad year"), "Please enter a valid year");
    }
}
