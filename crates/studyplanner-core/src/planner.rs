//! The planner facade.
//!
//! [`Planner`] owns the whole state and is the only thing that mutates it.
//! Every mutating command validates, applies the change in memory, then
//! saves through the [`StateStore`]. If the save fails the command returns
//! [`CoreError::Persistence`] but the in-memory change stays applied; the
//! next successful save (any later command, or [`Planner::save`]) brings
//! the store back in line.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, EntityKind, Result};
use crate::exam::{Exam, ExamView};
use crate::progress::{ProgressEngine, ProgressOutcome, StatsSnapshot};
use crate::scheduler::{DailySchedule, DailyScheduler};
use crate::storage::{Config, PlannerState, StateStore};
use crate::subject::{self, Priority, Subject};
use crate::task::{Task, TaskStatus};

/// Optional narrowing for [`Planner::find_tasks`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Subject id or name
    pub subject: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Confirmation returned by [`Planner::clear_all`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClearSummary {
    pub subjects_removed: usize,
    pub tasks_removed: usize,
    pub exams_removed: usize,
}

pub struct Planner<S: StateStore, C: Clock = SystemClock> {
    state: PlannerState,
    store: S,
    clock: C,
    scheduler: DailyScheduler,
    progress: ProgressEngine,
}

impl<S: StateStore> Planner<S, SystemClock> {
    /// Load state from `store` and use the system clock.
    ///
    /// # Errors
    /// `CorruptState` if the store holds an unreadable document.
    pub fn open(store: S, config: &Config) -> Result<Self> {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: StateStore, C: Clock> Planner<S, C> {
    /// Load state from `store` with an explicit clock.
    pub fn with_clock(store: S, config: &Config, clock: C) -> Result<Self> {
        let state = store.load()?;
        info!(
            location = %store.location().display(),
            subjects = state.subjects.len(),
            tasks = state.tasks.len(),
            "planner state loaded"
        );
        Ok(Self {
            state,
            store,
            clock,
            scheduler: DailyScheduler::with_config(config.scheduler.clone()),
            progress: ProgressEngine::with_config(config.progress.clone()),
        })
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Flush the current state. Callers may use this to retry after a
    /// `Persistence` error.
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.state).map_err(|e| {
            warn!(error = %e, "state not saved; memory is ahead of disk");
            e
        })
    }

    pub fn add_subject(
        &mut self,
        name: &str,
        hours_per_week: f64,
        priority: Priority,
        deadline: Option<NaiveDate>,
    ) -> Result<Subject> {
        let subject = Subject::create(
            name,
            hours_per_week,
            priority,
            deadline,
            &self.state.subjects,
        )?;
        info!(id = %subject.id, name = %subject.name, "subject added");
        self.state.subjects.push(subject.clone());
        self.save()?;
        Ok(subject)
    }

    pub fn list_subjects(&self) -> &[Subject] {
        &self.state.subjects
    }

    /// Adjust a subject's weekly hours and/or priority.
    pub fn update_subject(
        &mut self,
        reference: &str,
        hours_per_week: Option<f64>,
        priority: Option<Priority>,
    ) -> Result<Subject> {
        let id = subject::resolve(&self.state.subjects, reference)?.id.clone();
        let subject = self
            .state
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Subject, reference))?;

        if let Some(hours) = hours_per_week {
            subject.set_hours(hours)?;
        }
        if let Some(priority) = priority {
            subject.set_priority(priority);
        }
        let updated = subject.clone();
        info!(id = %updated.id, "subject updated");
        self.save()?;
        Ok(updated)
    }

    pub fn add_task(
        &mut self,
        subject_ref: &str,
        description: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<Task> {
        let task = Task::create(subject_ref, description, due_date, &self.state.subjects)?;
        info!(id = %task.id, subject_id = %task.subject_id, "task added");
        self.state.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    pub fn list_tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    /// Tasks matching `filter`, in insertion order.
    ///
    /// # Errors
    /// `NotFound` when the filter names an unknown subject.
    pub fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<&Task>> {
        let subject_id = match &filter.subject {
            Some(reference) => Some(subject::resolve(&self.state.subjects, reference)?.id.as_str()),
            None => None,
        };
        Ok(self
            .state
            .tasks
            .iter()
            .filter(|t| subject_id.map_or(true, |id| t.subject_id == id))
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .collect())
    }

    /// Mark a task done and award points.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `InvalidState` if the task is already
    /// done or skipped.
    pub fn complete_task(&mut self, task_id: &str) -> Result<ProgressOutcome> {
        let today = self.clock.today();
        let index = self.task_index(task_id)?;
        let outcome = self.progress.complete_task(
            &mut self.state.tasks[index],
            &mut self.state.user_stats,
            today,
        )?;
        info!(
            id = task_id,
            points = outcome.stats.points,
            streak = outcome.stats.current_streak,
            "task completed"
        );
        self.save()?;
        Ok(outcome)
    }

    /// Mark a task skipped and apply the penalty.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `InvalidState` if the task is already
    /// done or skipped.
    pub fn skip_task(&mut self, task_id: &str) -> Result<ProgressOutcome> {
        let today = self.clock.today();
        let index = self.task_index(task_id)?;
        let outcome = self.progress.skip_task(
            &mut self.state.tasks[index],
            &mut self.state.user_stats,
            today,
        )?;
        info!(id = task_id, points = outcome.stats.points, "task skipped");
        self.save()?;
        Ok(outcome)
    }

    pub fn add_exam(&mut self, name: &str, subject_ref: &str, date: NaiveDate) -> Result<Exam> {
        let exam = Exam::create(name, subject_ref, date, &self.state.subjects)?;
        info!(id = %exam.id, date = %exam.date, "exam added");
        self.state.exams.push(exam.clone());
        self.save()?;
        Ok(exam)
    }

    /// Exams with their countdown as of today, soonest first.
    pub fn list_exams(&self) -> Vec<ExamView> {
        let today = self.clock.today();
        let mut views: Vec<ExamView> = self
            .state
            .exams
            .iter()
            .map(|e| ExamView::new(e, today))
            .collect();
        views.sort_by_key(|v| v.exam.date);
        views
    }

    pub fn get_schedule(&self) -> DailySchedule {
        self.scheduler.generate(
            &self.state.subjects,
            &self.state.exams,
            &self.state.user_stats,
            self.clock.today(),
        )
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        self.progress.snapshot(&self.state.user_stats)
    }

    /// Drop everything and reset stats.
    pub fn clear_all(&mut self) -> Result<ClearSummary> {
        let summary = ClearSummary {
            subjects_removed: self.state.subjects.len(),
            tasks_removed: self.state.tasks.len(),
            exams_removed: self.state.exams.len(),
        };
        self.state = PlannerState::default();
        info!(?summary, "planner cleared");
        self.save()?;
        Ok(summary)
    }

    fn task_index(&self, task_id: &str) -> Result<usize> {
        self.state
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, task_id))
    }
}
