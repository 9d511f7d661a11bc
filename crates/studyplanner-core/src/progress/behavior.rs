//! Daily completion/skip history.
//!
//! One entry per calendar day, in insertion order. The log only grows
//! (oldest entries are dropped past a cap) and feeds the scheduler's
//! consistency factor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary of one day's outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BehaviorEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub tasks_skipped: u32,
}

impl BehaviorEntry {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tasks_completed: 0,
            tasks_skipped: 0,
        }
    }
}

/// Append-only behavior history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BehaviorLog {
    entries: Vec<BehaviorEntry>,
}

impl BehaviorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BehaviorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_completion(&mut self, today: NaiveDate, max_entries: usize) {
        self.entry_for(today).tasks_completed += 1;
        self.trim(max_entries);
    }

    pub fn record_skip(&mut self, today: NaiveDate, max_entries: usize) {
        self.entry_for(today).tasks_skipped += 1;
        self.trim(max_entries);
    }

    /// Completed and skipped totals over the `days` days ending today.
    pub fn window_totals(&self, today: NaiveDate, days: u32) -> (u32, u32) {
        let start = today
            .checked_sub_signed(chrono::Duration::days(i64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        self.entries
            .iter()
            .filter(|e| e.date >= start && e.date <= today)
            .fold((0, 0), |(done, skipped), e| {
                (done + e.tasks_completed, skipped + e.tasks_skipped)
            })
    }

    /// Today's entry, appended if the last one is for another day.
    ///
    /// A clock that moved backwards still lands on the last entry rather
    /// than inserting out of order.
    fn entry_for(&mut self, today: NaiveDate) -> &mut BehaviorEntry {
        let needs_new = match self.entries.last() {
            Some(last) => last.date < today,
            None => true,
        };
        if needs_new {
            self.entries.push(BehaviorEntry::empty(today));
        }
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    fn trim(&mut self, max_entries: usize) {
        if max_entries > 0 && self.entries.len() > max_entries {
            let excess = self.entries.len() - max_entries;
            self.entries.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn same_day_updates_single_entry() {
        let mut log = BehaviorLog::new();
        log.record_completion(day(1), 500);
        log.record_completion(day(1), 500);
        log.record_skip(day(1), 500);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].tasks_completed, 2);
        assert_eq!(log.entries()[0].tasks_skipped, 1);
    }

    #[test]
    fn new_day_appends_in_order() {
        let mut log = BehaviorLog::new();
        log.record_completion(day(1), 500);
        log.record_skip(day(3), 500);
        let dates: Vec<_> = log.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(1), day(3)]);
    }

    #[test]
    fn cap_drops_oldest() {
        let mut log = BehaviorLog::new();
        for d in 1..=5 {
            log.record_completion(day(d), 3);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0].date, day(3));
    }

    #[test]
    fn window_totals_only_counts_recent_days() {
        let mut log = BehaviorLog::new();
        log.record_completion(day(1), 500);
        log.record_skip(day(4), 500);
        log.record_skip(day(5), 500);
        log.record_completion(day(6), 500);
        assert_eq!(log.window_totals(day(6), 3), (1, 2));
        assert_eq!(log.window_totals(day(6), 10), (2, 2));
    }

    #[test]
    fn huge_window_counts_everything() {
        let mut log = BehaviorLog::new();
        log.record_completion(day(1), 500);
        log.record_skip(day(2), 500);
        assert_eq!(log.window_totals(day(2), u32::MAX), (1, 1));
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut log = BehaviorLog::new();
        log.record_completion(day(2), 500);
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"[{"date":"2024-03-02","tasks_completed":1,"tasks_skipped":0}]"#
        );
    }
}
