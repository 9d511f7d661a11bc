//! Day-based completion streaks.
//!
//! A streak counts consecutive calendar days with at least one completed
//! task. Only completions move it; skips never touch it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a completion on a given day did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First completion ever, or the previous active day was more than a day ago
    Started,
    /// Previous active day was yesterday
    Continued,
    /// Already active today
    Unchanged,
}

impl StreakChange {
    /// Classify a completion on `today` given the last active day.
    ///
    /// A last active day in the future (clock moved backwards) counts as
    /// already active today.
    pub fn classify(last_active: Option<NaiveDate>, today: NaiveDate) -> Self {
        match last_active {
            None => StreakChange::Started,
            Some(last) => match (today - last).num_days() {
                d if d <= 0 => StreakChange::Unchanged,
                1 => StreakChange::Continued,
                _ => StreakChange::Started,
            },
        }
    }

    /// Streak length after applying this change to `current`.
    pub fn apply(self, current: u32) -> u32 {
        match self {
            StreakChange::Started => 1,
            StreakChange::Continued => current.saturating_add(1),
            // A zero streak with a same-day completion can only come from a
            // hand-edited store; treat it as the first day.
            StreakChange::Unchanged => current.max(1),
        }
    }
}

/// Bonus for continuing a streak: grows with the new length, capped.
pub fn streak_bonus(change: StreakChange, new_streak: u32, per_day: u32, cap: u32) -> u32 {
    match change {
        StreakChange::Continued => new_streak.saturating_mul(per_day).min(cap),
        StreakChange::Started | StreakChange::Unchanged => 0,
    }
}
