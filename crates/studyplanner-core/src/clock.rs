//! Source of "today" for streaks, urgency, and exam countdowns.

use chrono::{Local, NaiveDate};

/// Supplies the current local date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a date, movable by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn set(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Move forward by `days`.
    pub fn advance(&mut self, days: i64) {
        self.date += chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
