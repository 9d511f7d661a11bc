//! # Study Planner Core Library
//!
//! This library provides the core business logic for the Study Planner.
//! All operations go through the [`Planner`] facade; front-ends (the CLI,
//! a chat bot) only parse input and render results.
//!
//! ## Architecture
//!
//! - **Entities**: [`Subject`], [`Task`], and [`Exam`], built only through
//!   validated constructors
//! - **Scheduler**: splits a daily study budget across subjects by weekly
//!   hours, priority, and urgency
//! - **Progress**: points, levels, streaks, and the behavior log
//! - **Storage**: one JSON state document, saved after every mutation, and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Planner`]: Command surface and sole owner of the state
//! - [`DailyScheduler`]: Daily time allocation
//! - [`ProgressEngine`]: Task completion/skip scoring
//! - [`StateStore`]: Trait for state persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod exam;
pub mod planner;
pub mod progress;
pub mod scheduler;
pub mod storage;
pub mod subject;
pub mod task;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, EntityKind, Result, ValidationError};
pub use exam::{Exam, ExamView};
pub use planner::{ClearSummary, Planner, TaskFilter};
pub use progress::{
    level_for_points, BehaviorEntry, ProgressConfig, ProgressEngine, ProgressOutcome,
    StatsSnapshot, UserStats,
};
pub use scheduler::{Allocation, DailySchedule, DailyScheduler, SchedulerConfig};
pub use storage::{Config, JsonFileStore, MemoryStore, PlannerState, StateStore};
pub use subject::{Priority, Subject};
pub use task::{Task, TaskStatus, TaskTransitionError};
