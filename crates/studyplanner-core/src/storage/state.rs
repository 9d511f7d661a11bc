//! The persisted state document.
//!
//! Everything the planner knows lives in one [`PlannerState`]: subjects,
//! tasks, exams, and user stats, tagged with a schema version. Derived
//! values (level, exam countdowns) are never stored.

use serde::{Deserialize, Serialize};

use crate::exam::Exam;
use crate::progress::UserStats;
use crate::subject::Subject;
use crate::task::Task;

/// Current document version. Older documents load with defaults for
/// missing fields; newer ones are refused.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub user_stats: UserStats,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            subjects: Vec::new(),
            tasks: Vec::new(),
            exams: Vec::new(),
            user_stats: UserStats::default(),
        }
    }
}

impl PlannerState {
    /// Check the invariants a loaded document must satisfy.
    ///
    /// Returns a description of the first problem found.
    pub fn check_integrity(&self) -> Result<(), String> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(format!(
                "schema version {} is newer than supported version {}",
                self.schema_version, SCHEMA_VERSION
            ));
        }

        let mut seen = std::collections::HashSet::new();
        let ids = self
            .subjects
            .iter()
            .map(|s| &s.id)
            .chain(self.tasks.iter().map(|t| &t.id))
            .chain(self.exams.iter().map(|e| &e.id));
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(format!("duplicate id {id}"));
            }
        }

        let subject_exists = |id: &str| self.subjects.iter().any(|s| s.id == id);
        if let Some(task) = self.tasks.iter().find(|t| !subject_exists(&t.subject_id)) {
            return Err(format!(
                "task {} references unknown subject {}",
                task.id, task.subject_id
            ));
        }
        if let Some(exam) = self.exams.iter().find(|e| !subject_exists(&e.subject_id)) {
            return Err(format!(
                "exam {} references unknown subject {}",
                exam.id, exam.subject_id
            ));
        }
        Ok(())
    }

    /// Serialize to the on-disk JSON form.
    pub fn to_document(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::Priority;

    #[test]
    fn old_document_without_optional_fields_loads() {
        let doc = r#"{
            "subjects": [{
                "id": "subject-1",
                "name": "Math",
                "hours_per_week": 5.0,
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let state: PlannerState = serde_json::from_str(doc).unwrap();
        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.subjects[0].priority, Priority::College);
        assert!(state.tasks.is_empty());
        assert_eq!(state.user_stats, UserStats::default());
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn dangling_task_fails_integrity() {
        let doc = r#"{
            "schema_version": 1,
            "tasks": [{
                "id": "task-1",
                "subject_id": "subject-gone",
                "description": "Read",
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let state: PlannerState = serde_json::from_str(doc).unwrap();
        let err = state.check_integrity().unwrap_err();
        assert!(err.contains("subject-gone"));
    }

    #[test]
    fn newer_schema_fails_integrity() {
        let state = PlannerState {
            schema_version: SCHEMA_VERSION + 1,
            ..Default::default()
        };
        assert!(state.check_integrity().is_err());
    }

    #[test]
    fn level_is_not_persisted() {
        let json = PlannerState::default().to_document().unwrap();
        assert!(!json.contains("level"));
    }
}
