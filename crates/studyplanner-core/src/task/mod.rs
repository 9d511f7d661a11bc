//! Study tasks and their status transitions.
//!
//! A task starts `pending` and is resolved exactly once:
//!
//!   PENDING ───done───> DONE
//!      |
//!      +──────skip───> SKIPPED
//!
//! Both resolved states are terminal. Resolving a task twice is rejected
//! with [`TaskTransitionError`] so points are never awarded twice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ValidationError};
use crate::subject::{self, Subject};

/// Task status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet resolved (initial state)
    #[default]
    Pending,
    /// Completed (terminal)
    Done,
    /// Skipped (terminal)
    Skipped,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        matches!(
            (self, to),
            (TaskStatus::Pending, TaskStatus::Done) | (TaskStatus::Pending, TaskStatus::Skipped)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "done" => Ok(TaskStatus::Done),
            "skipped" => Ok(TaskStatus::Skipped),
            _ => Err(ValidationError::InvalidValue {
                field: "status".into(),
                message: format!("expected pending, done or skipped, got '{s}'"),
            }),
        }
    }
}

/// A unit of work under a subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub subject_id: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Day the task was completed or skipped.
    #[serde(default)]
    pub resolved_on: Option<NaiveDate>,
}

impl Task {
    /// Build a validated task under `subject_id`.
    ///
    /// # Errors
    /// `NotFound` when no subject has that id, `Validation` when the
    /// description is blank.
    pub fn create(
        subject_id: &str,
        description: &str,
        due_date: Option<NaiveDate>,
        subjects: &[Subject],
    ) -> Result<Self> {
        let subject = subject::resolve(subjects, subject_id)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            }
            .into());
        }

        Ok(Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            subject_id: subject.id.clone(),
            description: description.to_string(),
            status: TaskStatus::Pending,
            due_date,
            created_at: Utc::now(),
            resolved_on: None,
        })
    }

    /// Transition to a terminal status on `today`.
    ///
    /// Returns an error if the transition is invalid; the task is left
    /// untouched in that case.
    pub fn transition_to(
        &mut self,
        new_status: TaskStatus,
        today: NaiveDate,
    ) -> std::result::Result<(), TaskTransitionError> {
        if !self.status.can_transition_to(&new_status) {
            return Err(TaskTransitionError {
                task_id: self.id.clone(),
                from: self.status,
                to: new_status,
            });
        }
        self.status = new_status;
        self.resolved_on = Some(today);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

/// Error returned when an invalid state transition is attempted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskTransitionError {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl fmt::Display for TaskTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task {} is already {}, cannot mark it {}",
            self.task_id, self.from, self.to
        )
    }
}

impl std::error::Error for TaskTransitionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, EntityKind};
    use crate::subject::Priority;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn subjects() -> Vec<Subject> {
        vec![Subject::create("Algorithms", 4.0, Priority::Coding, None, &[]).unwrap()]
    }

    #[test]
    fn create_links_to_subject() {
        let subjects = subjects();
        let task = Task::create(&subjects[0].id, " Read chapter 3 ", None, &subjects).unwrap();
        assert_eq!(task.subject_id, subjects[0].id);
        assert_eq!(task.description, "Read chapter 3");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.starts_with("task-"));
    }

    #[test]
    fn create_rejects_unknown_subject() {
        let err = Task::create("subject-missing", "Read", None, &subjects()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotFound {
                kind: EntityKind::Subject,
                ..
            }
        ));
    }

    #[test]
    fn create_rejects_blank_description() {
        let subjects = subjects();
        let err = Task::create(&subjects[0].id, "  ", None, &subjects).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn valid_transitions() {
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Done));
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Skipped));
        assert!(!TaskStatus::Done.can_transition_to(&TaskStatus::Pending));
        assert!(!TaskStatus::Done.can_transition_to(&TaskStatus::Done));
        assert!(!TaskStatus::Skipped.can_transition_to(&TaskStatus::Done));
        assert!(!TaskStatus::Pending.can_transition_to(&TaskStatus::Pending));
    }

    #[test]
    fn second_resolution_is_rejected() {
        let subjects = subjects();
        let mut task = Task::create(&subjects[0].id, "Graphs", None, &subjects).unwrap();
        task.transition_to(TaskStatus::Done, today()).unwrap();
        assert_eq!(task.resolved_on, Some(today()));

        let err = task.transition_to(TaskStatus::Skipped, today()).unwrap_err();
        assert_eq!(err.from, TaskStatus::Done);
        assert_eq!(err.to, TaskStatus::Skipped);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [TaskStatus::Pending, TaskStatus::Done, TaskStatus::Skipped] {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
    }
}
