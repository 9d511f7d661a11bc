//! Exams: dated milestones that raise a subject's urgency.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::subject::{self, Subject};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exam {
    pub id: String,
    pub name: String,
    pub subject_id: String,
    pub date: NaiveDate,
}

impl Exam {
    /// Build a validated exam for the subject `subject_id`.
    ///
    /// # Errors
    /// `NotFound` for an unknown subject, `Validation` for a blank name.
    pub fn create(
        name: &str,
        subject_id: &str,
        date: NaiveDate,
        subjects: &[Subject],
    ) -> Result<Self> {
        let subject = subject::resolve(subjects, subject_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }

        Ok(Exam {
            id: format!("exam-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            subject_id: subject.id.clone(),
            date,
        })
    }

    /// Days until the exam; negative once it has passed.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.date - today).num_days()
    }
}

/// An exam together with its countdown, computed at read time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExamView {
    #[serde(flatten)]
    pub exam: Exam,
    pub days_left: i64,
}

impl ExamView {
    pub fn new(exam: &Exam, today: NaiveDate) -> Self {
        Self {
            exam: exam.clone(),
            days_left: exam.days_left(today),
        }
    }
}

/// Nearest exam for `subject_id` that is today or later.
pub fn next_exam_for<'a>(exams: &'a [Exam], subject_id: &str, today: NaiveDate) -> Option<&'a Exam> {
    exams
        .iter()
        .filter(|e| e.subject_id == subject_id && e.date >= today)
        .min_by_key(|e| e.date)
}
