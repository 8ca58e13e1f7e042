//! Task counts and daily completion analytics

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filter::is_overdue;
use crate::task::{Priority, Task};

/// Counts over a task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Pending tasks per priority
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStats {
    pub fn compute<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: NaiveDateTime) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            if task.done {
                stats.done += 1;
                continue;
            }
            stats.pending += 1;
            if is_overdue(task, now) {
                stats.overdue += 1;
            }
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }

    /// Pending count for one priority
    pub fn pending_with(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Usage counters that reset every calendar day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub sessions: u32,
    pub completed_today: u32,
    pub last_reset: Option<NaiveDate>,
}

impl Analytics {
    /// Reset the counters if `today` differs from the last reset day
    ///
    /// Returns true when a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset == Some(today) {
            return false;
        }
        self.sessions = 0;
        self.completed_today = 0;
        self.last_reset = Some(today);
        true
    }

    pub fn record_session(&mut self) {
        self.sessions += 1;
    }

    pub fn record_completion(&mut self) {
        self.completed_today += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    use crate::task::TaskId;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_compute_counts() {
        let stamp = Local.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 13);
        let tasks = vec![
            Task::new(TaskId(1), "a", stamp).with_priority(Priority::High),
            Task::new(TaskId(2), "b", stamp)
                .with_priority(Priority::High)
                .with_due(yesterday, None),
            Task::new(TaskId(3), "c", stamp).with_priority(Priority::Low),
            Task::new(TaskId(4), "d", stamp)
                .with_priority(Priority::High)
                .with_due(yesterday, None)
                .with_done(true),
        ];
        let now = today().and_hms_opt(12, 0, 0).unwrap();
        let stats = TaskStats::compute(&tasks, now);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.done, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.pending_with(Priority::High), 2);
        assert_eq!(stats.pending_with(Priority::Medium), 0);
        assert_eq!(stats.pending_with(Priority::Low), 1);
    }

    #[test]
    fn test_roll_over_resets_once_per_day() {
        let mut analytics = Analytics::default();
        assert!(analytics.roll_over(today()));

        analytics.record_completion();
        analytics.record_session();
        assert!(!analytics.roll_over(today()));
        assert_eq!(analytics.completed_today, 1);

        let tomorrow = today().succ_opt().unwrap();
        assert!(analytics.roll_over(tomorrow));
        assert_eq!(analytics.completed_today, 0);
        assert_eq!(analytics.sessions, 0);
        assert_eq!(analytics.last_reset, Some(tomorrow));
    }
}
