//! Daily study-time allocation.
//!
//! This module splits one day's study budget across subjects:
//! - Weights subjects by weekly hours, priority, and urgency
//! - Derives the daily budget from weekly hours (or a configured override)
//! - Scales the budget by recent consistency (streaks up, heavy skipping down)
//! - Hands out whole minutes so the allocations sum to the budget exactly

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::exam::{next_exam_for, Exam};
use crate::progress::UserStats;
use crate::subject::{Priority, Subject};

/// One subject's share of the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub subject_id: String,
    pub subject_name: String,
    pub weight: f64,
    pub minutes: u32,
    /// Deadline or exam within the urgency window
    pub urgent: bool,
}

/// Today's plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub budget_minutes: u32,
    /// Multiplier applied to the base budget
    pub consistency_factor: f64,
    pub allocations: Vec<Allocation>,
}

impl DailySchedule {
    pub fn total_minutes(&self) -> u32 {
        self.allocations.iter().map(|a| a.minutes).sum()
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    /// Fixed daily budget; derived from weekly hours when unset
    #[serde(default)]
    pub daily_budget_minutes: Option<u32>,
    /// Multiplier for `coding` subjects
    #[serde(default = "default_coding_multiplier")]
    pub coding_multiplier: f64,
    /// Multiplier for `college` subjects
    #[serde(default = "default_college_multiplier")]
    pub college_multiplier: f64,
    /// Extra multiplier for subjects with a deadline or exam coming up
    #[serde(default = "default_deadline_multiplier")]
    pub deadline_multiplier: f64,
    /// How close (days) a deadline or exam must be to count as urgent
    #[serde(default = "default_urgency_window_days")]
    pub urgency_window_days: i64,
    /// Streak length at which the budget is boosted
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: u32,
    #[serde(default = "default_streak_boost")]
    pub streak_boost: f64,
    /// Budget multiplier when skips outnumber completions recently
    #[serde(default = "default_skip_damping")]
    pub skip_damping: f64,
    /// Days of behavior history to inspect
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_coding_multiplier() -> f64 {
    1.5
}
fn default_college_multiplier() -> f64 {
    1.0
}
fn default_deadline_multiplier() -> f64 {
    1.5
}
fn default_urgency_window_days() -> i64 {
    7
}
fn default_streak_threshold() -> u32 {
    3
}
fn default_streak_boost() -> f64 {
    1.1
}
fn default_skip_damping() -> f64 {
    0.8
}
fn default_lookback_days() -> u32 {
    3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_budget_minutes: None,
            coding_multiplier: default_coding_multiplier(),
            college_multiplier: default_college_multiplier(),
            deadline_multiplier: default_deadline_multiplier(),
            urgency_window_days: default_urgency_window_days(),
            streak_threshold: default_streak_threshold(),
            streak_boost: default_streak_boost(),
            skip_damping: default_skip_damping(),
            lookback_days: default_lookback_days(),
        }
    }
}

/// Computes daily allocations.
#[derive(Debug, Clone, Default)]
pub struct DailyScheduler {
    config: SchedulerConfig,
}

impl DailyScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generate the schedule for `today`.
    ///
    /// Subjects come back ordered by weight, heaviest first; equal weights
    /// keep their insertion order. No subjects yields an empty schedule.
    pub fn generate(
        &self,
        subjects: &[Subject],
        exams: &[Exam],
        stats: &UserStats,
        today: NaiveDate,
    ) -> DailySchedule {
        if subjects.is_empty() {
            return DailySchedule {
                date: today,
                budget_minutes: 0,
                consistency_factor: 1.0,
                allocations: Vec::new(),
            };
        }

        let consistency_factor = self.consistency_factor(stats, today);
        let budget = self.daily_budget(subjects, consistency_factor);

        let mut weighted: Vec<(usize, &Subject, f64, bool)> = subjects
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let urgent = self.is_urgent(s, exams, today);
                (i, s, self.weight(s, urgent), urgent)
            })
            .collect();

        // Stable: ties keep insertion order
        weighted.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

        let minutes = distribute(budget, &weighted.iter().map(|w| w.2).collect::<Vec<_>>());

        let allocations = weighted
            .into_iter()
            .zip(minutes)
            .map(|((_, subject, weight, urgent), minutes)| Allocation {
                subject_id: subject.id.clone(),
                subject_name: subject.name.clone(),
                weight,
                minutes,
                urgent,
            })
            .collect::<Vec<_>>();

        debug!(
            budget,
            consistency_factor,
            subjects = allocations.len(),
            "schedule generated"
        );
        DailySchedule {
            date: today,
            budget_minutes: budget,
            consistency_factor,
            allocations,
        }
    }

    /// Subject weight: weekly hours × priority × urgency.
    ///
    /// A zero priority multiplier counts as 1, so such subjects still get
    /// their share from weekly hours alone.
    pub fn weight(&self, subject: &Subject, urgent: bool) -> f64 {
        let priority = match subject.priority {
            Priority::Coding => self.config.coding_multiplier,
            Priority::College => self.config.college_multiplier,
            Priority::Weight(w) => w,
        };
        let priority = if priority == 0.0 { 1.0 } else { priority };
        let urgency = if urgent {
            self.config.deadline_multiplier
        } else {
            1.0
        };
        subject.hours_per_week * priority * urgency
    }

    /// Whether the subject's deadline or next exam falls inside the window.
    pub fn is_urgent(&self, subject: &Subject, exams: &[Exam], today: NaiveDate) -> bool {
        let within = |date: NaiveDate| {
            let days = (date - today).num_days();
            (0..=self.config.urgency_window_days).contains(&days)
        };
        subject.deadline.is_some_and(within)
            || next_exam_for(exams, &subject.id, today).is_some_and(|e| within(e.date))
    }

    /// Budget multiplier from recent behavior.
    pub fn consistency_factor(&self, stats: &UserStats, today: NaiveDate) -> f64 {
        let (completed, skipped) = stats
            .behavior_log
            .window_totals(today, self.config.lookback_days);

        let mut factor = 1.0;
        if stats.current_streak >= self.config.streak_threshold {
            factor *= self.config.streak_boost;
        }
        if skipped > completed {
            factor *= self.config.skip_damping;
        }
        factor
    }

    /// Whole-minute budget for the day.
    pub fn daily_budget(&self, subjects: &[Subject], consistency_factor: f64) -> u32 {
        let base = match self.config.daily_budget_minutes {
            Some(minutes) => f64::from(minutes),
            None => {
                let weekly_hours: f64 = subjects.iter().map(|s| s.hours_per_week).sum();
                (weekly_hours * 60.0 / 7.0).round()
            }
        };
        (base * consistency_factor).round().max(0.0) as u32
    }
}

/// Split `budget` proportionally to `weights`, flooring each share.
///
/// The rounding remainder goes to the heaviest entry (the first one on
/// ties), so the result always sums to `budget`.
fn distribute(budget: u32, weights: &[f64]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let total: f64 = weights.iter().sum();
    let mut shares: Vec<u32> = if total > 0.0 {
        weights
            .iter()
            .map(|w| ((f64::from(budget) * w / total).floor() as u32).min(budget))
            .collect()
    } else {
        vec![0; weights.len()]
    };

    let assigned: u32 = shares.iter().sum();
    let heaviest = weights
        .iter()
        .enumerate()
        .fold(0, |best, (i, w)| if *w > weights[best] { i } else { best });
    // Floors can only undershoot, but clamp in case float error overshoots
    if assigned <= budget {
        shares[heaviest] += budget - assigned;
    } else {
        let mut excess = assigned - budget;
        for share in shares.iter_mut().rev() {
            let take = excess.min(*share);
            *share -= take;
            excess -= take;
            if excess == 0 {
                break;
            }
        }
    }
    shares
}
