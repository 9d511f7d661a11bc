//! Points, levels, and streaks.
//!
//! The [`ProgressEngine`] resolves tasks and updates [`UserStats`] in one
//! step: completions award points and advance the streak, skips deduct a
//! penalty. Level is never stored; it is derived from points on read.

mod behavior;
mod streak;

pub use behavior::{BehaviorEntry, BehaviorLog};
pub use streak::{streak_bonus, StreakChange};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::task::{Task, TaskStatus};

/// Point and level tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressConfig {
    /// Points for every completed task
    #[serde(default = "default_base_points")]
    pub base_points: u32,
    /// Bonus per streak day when a streak continues
    #[serde(default = "default_streak_bonus_per_day")]
    pub streak_bonus_per_day: u32,
    /// Upper bound on the streak bonus
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: u32,
    /// Points removed for a skipped task
    #[serde(default = "default_skip_penalty")]
    pub skip_penalty: u32,
    /// Points per level step
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u32,
    /// Behavior log entries kept
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

fn default_base_points() -> u32 {
    10
}
fn default_streak_bonus_per_day() -> u32 {
    2
}
fn default_streak_bonus_cap() -> u32 {
    20
}
fn default_skip_penalty() -> u32 {
    5
}
fn default_points_per_level() -> u32 {
    100
}
fn default_max_log_entries() -> usize {
    500
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            base_points: default_base_points(),
            streak_bonus_per_day: default_streak_bonus_per_day(),
            streak_bonus_cap: default_streak_bonus_cap(),
            skip_penalty: default_skip_penalty(),
            points_per_level: default_points_per_level(),
            max_log_entries: default_max_log_entries(),
        }
    }
}

/// Level reached with `points`. Starts at 1 and steps up every
/// `points_per_level` points.
pub fn level_for_points(points: u32, points_per_level: u32) -> u32 {
    (points / points_per_level.max(1)).saturating_add(1)
}

/// Persisted gamification state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Day of the last completion
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default)]
    pub behavior_log: BehaviorLog,
}

/// Read-only view of [`UserStats`] with derived fields filled in.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSnapshot {
    pub points: u32,
    pub level: u32,
    pub points_to_next_level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
    pub behavior_log: Vec<BehaviorEntry>,
}

/// Result of resolving a task.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressOutcome {
    pub task: Task,
    pub stats: StatsSnapshot,
    pub points_awarded: u32,
    pub streak_bonus: u32,
    pub points_deducted: u32,
    pub leveled_up: bool,
}

/// Applies task outcomes to user stats.
#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    config: ProgressConfig,
}

impl ProgressEngine {
    /// Create an engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: ProgressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    pub fn level(&self, stats: &UserStats) -> u32 {
        level_for_points(stats.points, self.config.points_per_level)
    }

    pub fn snapshot(&self, stats: &UserStats) -> StatsSnapshot {
        let per_level = self.config.points_per_level.max(1);
        let level = self.level(stats);
        StatsSnapshot {
            points: stats.points,
            level,
            points_to_next_level: level.saturating_mul(per_level).saturating_sub(stats.points),
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            last_active_date: stats.last_active_date,
            behavior_log: stats.behavior_log.entries().to_vec(),
        }
    }

    /// Mark `task` done on `today` and award points.
    ///
    /// # Errors
    /// `InvalidState` if the task was already resolved; neither the task nor
    /// the stats change in that case.
    pub fn complete_task(
        &self,
        task: &mut Task,
        stats: &mut UserStats,
        today: NaiveDate,
    ) -> Result<ProgressOutcome> {
        task.transition_to(TaskStatus::Done, today)?;

        let level_before = self.level(stats);
        let change = StreakChange::classify(stats.last_active_date, today);
        stats.current_streak = change.apply(stats.current_streak);
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        if stats.last_active_date.map_or(true, |last| last < today) {
            stats.last_active_date = Some(today);
        }

        let bonus = streak_bonus(
            change,
            stats.current_streak,
            self.config.streak_bonus_per_day,
            self.config.streak_bonus_cap,
        );
        let awarded = self.config.base_points + bonus;
        stats.points = stats.points.saturating_add(awarded);
        stats
            .behavior_log
            .record_completion(today, self.config.max_log_entries);

        debug!(
            task_id = %task.id,
            awarded,
            streak = stats.current_streak,
            ?change,
            "task completed"
        );

        Ok(ProgressOutcome {
            task: task.clone(),
            stats: self.snapshot(stats),
            points_awarded: awarded,
            streak_bonus: bonus,
            points_deducted: 0,
            leveled_up: self.level(stats) > level_before,
        })
    }

    /// Mark `task` skipped on `today` and apply the penalty.
    ///
    /// Points never drop below zero. The streak is left alone.
    ///
    /// # Errors
    /// `InvalidState` if the task was already resolved.
    pub fn skip_task(
        &self,
        task: &mut Task,
        stats: &mut UserStats,
        today: NaiveDate,
    ) -> Result<ProgressOutcome> {
        task.transition_to(TaskStatus::Skipped, today)?;

        let before = stats.points;
        stats.points = stats.points.saturating_sub(self.config.skip_penalty);
        stats
            .behavior_log
            .record_skip(today, self.config.max_log_entries);

        debug!(task_id = %task.id, deducted = before - stats.points, "task skipped");

        Ok(ProgressOutcome {
            task: task.clone(),
            stats: self.snapshot(stats),
            points_awarded: 0,
            streak_bonus: 0,
            points_deducted: before - stats.points,
            leveled_up: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::subject::{Priority, Subject};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn new_task(subjects: &[Subject]) -> Task {
        Task::create(&subjects[0].id, "Practice", None, subjects).unwrap()
    }

    fn subjects() -> Vec<Subject> {
        vec![Subject::create("Math", 5.0, Priority::Coding, None, &[]).unwrap()]
    }

    #[test]
    fn level_steps_every_hundred_points() {
        assert_eq!(level_for_points(0, 100), 1);
        assert_eq!(level_for_points(99, 100), 1);
        assert_eq!(level_for_points(100, 100), 2);
        assert_eq!(level_for_points(250, 100), 3);
        assert_eq!(level_for_points(5, 0), 6);
    }

    #[test]
    fn snapshot_near_max_points_does_not_overflow() {
        let engine = ProgressEngine::new();
        let stats = UserStats {
            points: u32::MAX - 3,
            ..Default::default()
        };
        let snapshot = engine.snapshot(&stats);
        assert_eq!(snapshot.level, u32::MAX / 100 + 1);
        assert_eq!(snapshot.points_to_next_level, 3);
        assert_eq!(level_for_points(u32::MAX, 1), u32::MAX);
    }

    #[test]
    fn first_completion_starts_streak_without_bonus() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();
        let mut task = new_task(&subjects);

        let outcome = engine.complete_task(&mut task, &mut stats, day(1)).unwrap();
        assert_eq!(outcome.points_awarded, 10);
        assert_eq!(outcome.streak_bonus, 0);
        assert_eq!(stats.points, 10);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.last_active_date, Some(day(1)));
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn consecutive_days_earn_bonus() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();

        engine.complete_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        let outcome = engine
            .complete_task(&mut new_task(&subjects), &mut stats, day(2))
            .unwrap();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(outcome.streak_bonus, 4);
        assert_eq!(outcome.points_awarded, 14);
        assert_eq!(stats.points, 24);
    }

    #[test]
    fn same_day_completion_keeps_streak_and_skips_bonus() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();

        engine.complete_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        let outcome = engine
            .complete_task(&mut new_task(&subjects), &mut stats, day(1))
            .unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(outcome.points_awarded, 10);
        assert_eq!(stats.behavior_log.entries()[0].tasks_completed, 2);
    }

    #[test]
    fn gap_resets_streak_but_keeps_longest() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();

        for d in 1..=3 {
            engine.complete_task(&mut new_task(&subjects), &mut stats, day(d)).unwrap();
        }
        assert_eq!(stats.current_streak, 3);
        engine.complete_task(&mut new_task(&subjects), &mut stats, day(5)).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn skip_penalty_floors_at_zero() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats {
            points: 3,
            ..Default::default()
        };
        let outcome = engine.skip_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        assert_eq!(stats.points, 0);
        assert_eq!(outcome.points_deducted, 3);
        assert_eq!(stats.behavior_log.entries()[0].tasks_skipped, 1);
    }

    #[test]
    fn skip_does_not_touch_streak() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();
        engine.complete_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        engine.skip_task(&mut new_task(&subjects), &mut stats, day(2)).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.last_active_date, Some(day(1)));
    }

    #[test]
    fn all_skip_day_does_not_start_streak() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();
        engine.skip_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.last_active_date, None);
    }

    #[test]
    fn recompletion_is_rejected_without_side_effects() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats::default();
        let mut task = new_task(&subjects);
        engine.complete_task(&mut task, &mut stats, day(1)).unwrap();
        let before = stats.clone();

        let err = engine.complete_task(&mut task, &mut stats, day(2)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(stats, before);
    }

    #[test]
    fn crossing_threshold_reports_level_up() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats {
            points: 95,
            ..Default::default()
        };
        let outcome = engine.complete_task(&mut new_task(&subjects), &mut stats, day(1)).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(outcome.stats.level, 2);
        assert_eq!(outcome.stats.points_to_next_level, 95);
    }

    #[test]
    fn future_last_active_is_not_moved_back() {
        let engine = ProgressEngine::new();
        let subjects = subjects();
        let mut stats = UserStats {
            current_streak: 4,
            longest_streak: 4,
            last_active_date: Some(day(10)),
            ..Default::default()
        };
        engine.complete_task(&mut new_task(&subjects), &mut stats, day(8)).unwrap();
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.last_active_date, Some(day(10)));
    }
}
