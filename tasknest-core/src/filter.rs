//! Task filtering and ordering logic
//!
//! Provides a builder-style API for selecting the tasks of a view. Filtering
//! is pure: it never mutates tasks and always returns them in manual order.

use chrono::{Days, NaiveDateTime};

use crate::date::due_instant;
use crate::task::{Priority, Task, TaskList};

/// Top-level view. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Every task that is not done
    #[default]
    All,
    /// Due on the current date
    Today,
    /// Due within the next seven days
    Week,
    /// Past due and not done
    Overdue,
    /// Done
    Completed,
}

impl View {
    /// Check if a task belongs to this view
    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        match self {
            View::All => !task.done,
            View::Today => is_today(task, now),
            View::Week => is_this_week(task, now),
            View::Overdue => is_overdue(task, now),
            View::Completed => task.done,
        }
    }
}

/// Due date equals the current calendar date
pub fn is_today(task: &Task, now: NaiveDateTime) -> bool {
    task.due_date == Some(now.date())
}

/// Due date, taken at local midnight, lies in `[now, now + 7 days]`
///
/// The due time is ignored here, so a task due later today is already
/// outside the window.
pub fn is_this_week(task: &Task, now: NaiveDateTime) -> bool {
    let Some(date) = task.due_date else {
        return false;
    };
    let due = due_instant(date, None);
    match now.checked_add_days(Days::new(7)) {
        Some(week_from_now) => due >= now && due <= week_from_now,
        None => false,
    }
}

/// Not done and the due instant is strictly before `now`
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date {
        Some(date) if !task.done => due_instant(date, task.due_time) < now,
        _ => false,
    }
}

/// Builder for filtering tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub view: View,
    /// Exact category match
    pub category: Option<String>,
    /// Exact priority match
    pub priority: Option<Priority>,
    /// Search term for text (case-insensitive)
    pub search: Option<String>,
}

impl FilterSpec {
    /// Create a new filter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a view
    pub fn view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Filter by exact category
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set category filter; empty means no constraint
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.is_empty());
        self
    }

    /// Filter by priority
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Filter by search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set search term; empty means no constraint
    pub fn with_search(mut self, term: Option<String>) -> Self {
        self.search = term.filter(|t| !t.is_empty());
        self
    }

    /// True when anything beyond the view narrows the result
    pub fn is_narrowed(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.is_empty())
            || self.priority.is_some()
            || self.search.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Check if a task matches this filter
    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        if !self.view.matches(task, now) {
            return false;
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if task.category.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        if let Some(term) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !task.text.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Apply filter and manual ordering to a collection of tasks
    pub fn apply<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a Task>,
        now: NaiveDateTime,
    ) -> Vec<&'a Task> {
        let mut filtered: Vec<&Task> = tasks
            .into_iter()
            .filter(|t| self.matches(t, now))
            .collect();
        // Stable, so equal orders keep their input sequence
        filtered.sort_by_key(|t| t.order);
        filtered
    }
}

/// Extension trait for TaskList to support filtering
pub trait FilterExt {
    /// Get tasks filtered and ordered according to `spec`
    fn get_filtered(&self, spec: &FilterSpec, now: NaiveDateTime) -> Vec<&Task>;
}

impl FilterExt for TaskList {
    fn get_filtered(&self, spec: &FilterSpec, now: NaiveDateTime) -> Vec<&Task> {
        spec.apply(self.iter(), now)
    }
}
