//! Subjects: courses or topic areas with a weekly time budget.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, EntityKind, Result, ValidationError};

/// How much a subject matters relative to others.
///
/// `Coding` and `College` are the two built-in tracks; `Weight` is a raw
/// multiplier for anything else (0 means "no preference").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Coding-interview preparation
    Coding,
    /// College coursework
    #[default]
    College,
    /// Explicit numeric weight
    Weight(f64),
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Coding => write!(f, "coding"),
            Priority::College => write!(f, "college"),
            Priority::Weight(w) => write!(f, "{w}"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coding" => Ok(Priority::Coding),
            "college" => Ok(Priority::College),
            other => match other.parse::<f64>() {
                Ok(w) if w.is_finite() && w >= 0.0 => Ok(Priority::Weight(w)),
                _ => Err(ValidationError::InvalidValue {
                    field: "priority".into(),
                    message: format!("expected 'coding', 'college' or a non-negative number, got '{s}'"),
                }),
            },
        }
    }
}

/// A course or topic area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub hours_per_week: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    /// Build a validated subject.
    ///
    /// # Errors
    /// `Validation` when the name is blank, the hours are not a positive
    /// number, or `existing` already holds a subject of the same name
    /// (ignoring case).
    pub fn create(
        name: &str,
        hours_per_week: f64,
        priority: Priority,
        deadline: Option<NaiveDate>,
        existing: &[Subject],
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        validate_hours(hours_per_week)?;
        if find_by_name(existing, name).is_some() {
            return Err(ValidationError::DuplicateSubject(name.to_string()).into());
        }

        Ok(Subject {
            id: format!("subject-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            hours_per_week,
            priority,
            deadline,
            created_at: Utc::now(),
        })
    }

    /// Change the weekly hours, keeping the positivity rule.
    pub fn set_hours(&mut self, hours_per_week: f64) -> Result<()> {
        validate_hours(hours_per_week)?;
        self.hours_per_week = hours_per_week;
        Ok(())
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

fn validate_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ValidationError::NonPositiveHours(hours).into());
    }
    Ok(())
}

/// Case-insensitive lookup by name.
pub fn find_by_name<'a>(subjects: &'a [Subject], name: &str) -> Option<&'a Subject> {
    subjects.iter().find(|s| s.matches_name(name))
}

/// Resolve a subject reference that is either an id or a name.
///
/// Ids win over names so a subject literally named like another's id
/// cannot shadow it.
pub fn resolve<'a>(subjects: &'a [Subject], reference: &str) -> Result<&'a Subject> {
    subjects
        .iter()
        .find(|s| s.id == reference)
        .or_else(|| find_by_name(subjects, reference))
        .ok_or_else(|| CoreError::not_found(EntityKind::Subject, reference))
}
