//! Task domain model
//!
//! Pure domain logic for task management with no I/O operations.

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::order;

/// Newtype wrapper for task IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(CoreError::parse(format!(
                "Unknown priority '{}'. Expected high, medium or low",
                other
            ))),
        }
    }
}

/// A single task
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub priority: Priority,
    /// Category without the `#` prefix (None = no category)
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Only meaningful together with `due_date`; None = all day
    pub due_time: Option<NaiveTime>,
    /// Reserved, never set by the parser
    pub recurring: bool,
    pub recurrence: String,
    pub created_at: DateTime<Local>,
    pub completed_at: Option<DateTime<Local>>,
    /// Manual display position, dense across the whole list
    pub order: usize,
}

impl Task {
    /// Create a new task with the given text
    pub fn new(id: TaskId, text: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
            priority: Priority::default(),
            category: None,
            due_date: None,
            due_time: None,
            recurring: false,
            recurrence: String::new(),
            created_at,
            completed_at: None,
            order: 0,
        }
    }

    /// Builder method to set priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set category
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Builder method to set the due date and optional time
    pub fn with_due(mut self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        self.due_date = date;
        self.due_time = time;
        self
    }

    /// Builder method to set completion status
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Builder method to set the manual order
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Toggle completion status, stamping or clearing `completed_at`
    ///
    /// Returns the new `done` value.
    pub fn toggle_done(&mut self, now: DateTime<Local>) -> bool {
        self.done = !self.done;
        self.completed_at = if self.done { Some(now) } else { None };
        self.done
    }
}

/// Field changes for an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
    /// `Some(None)` clears the due date (and time)
    pub due_date: Option<Option<NaiveDate>>,
    /// `Some(None)` makes the task all-day
    pub due_time: Option<Option<NaiveTime>>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.due_time.is_none()
    }

    fn apply_to(self, task: &mut Task) {
        if let Some(text) = self.text {
            let text = text.trim();
            // Blank or unchanged text keeps the current one
            if !text.is_empty() && text != task.text {
                task.text = text.to_string();
            }
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category.filter(|c| !c.is_empty());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
            if due_date.is_none() {
                task.due_time = None;
            }
        }
        if let Some(due_time) = self.due_time {
            task.due_time = due_time;
        }
    }
}

/// In-memory ordered list of tasks
///
/// List position and `Task::order` always agree after a mutation.
/// Persistence is handled by storage adapters in consuming crates.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Create a new empty task list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored tasks, restoring the manual order
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(|t| t.order);
        order::renumber(&mut tasks);
        Self { tasks }
    }

    /// Consume the list, yielding tasks in display order
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Insert a detached task at the head of the list and renumber
    ///
    /// The id is bumped until it is unique within the list.
    pub fn push_front(&mut self, task: Task) -> TaskId {
        self.insert_at(0, task)
    }

    /// Insert a task at `index` (clamped to the list length) and renumber
    ///
    /// The id is bumped until it is unique within the list.
    pub fn insert_at(&mut self, index: usize, mut task: Task) -> TaskId {
        while self.contains(task.id) {
            task.id = TaskId(task.id.0 + 1);
        }
        let id = task.id;
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
        order::renumber(&mut self.tasks);
        id
    }

    /// Remove a task, returning it with its former list index
    pub fn remove(&mut self, id: TaskId) -> Option<(usize, Task)> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);
        order::renumber(&mut self.tasks);
        Some((index, task))
    }

    /// Apply a drag-and-drop commit. See [`order::reorder`].
    pub fn reorder(&mut self, ids: &[TaskId]) -> Result<()> {
        order::reorder(&mut self.tasks, ids)
    }

    /// Reverse the manual order of the whole list
    pub fn reverse(&mut self) {
        order::reverse(&mut self.tasks);
    }

    /// Apply field changes to a task
    pub fn edit(&mut self, id: TaskId, edit: TaskEdit) -> Result<&Task> {
        let task = self.get_mut_or_err(id)?;
        edit.apply_to(task);
        Ok(task)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// List index of a task
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Get a task by ID
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Get or return error if task not found
    pub fn get_or_err(&self, id: TaskId) -> Result<&Task> {
        self.get(id).ok_or(CoreError::TaskNotFound(id))
    }

    /// Get mutable or return error if task not found
    pub fn get_mut_or_err(&mut self, id: TaskId) -> Result<&mut Task> {
        self.get_mut(id).ok_or(CoreError::TaskNotFound(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Count total tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if list is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count tasks that are not done
    pub fn count_pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    /// Distinct categories in list order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.tasks.iter().filter_map(|t| t.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    fn task(id: u64, text: &str) -> Task {
        Task::new(TaskId(id), text, stamp())
    }

    fn orders(list: &TaskList) -> Vec<usize> {
        list.iter().map(|t| t.order).collect()
    }

    #[test]
    fn test_task_creation() {
        let task = task(1, "Test task");

        assert_eq!(task.id, TaskId(1));
        assert_eq!(task.text, "Test task");
        assert!(!task.done);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed_at.is_none());
        assert!(!task.recurring);
        assert!(task.recurrence.is_empty());
    }

    #[test]
    fn test_task_toggle_stamps_completion() {
        let mut task = task(1, "Test")
            .with_priority(Priority::High)
            .with_category(Some("work".to_string()));
        let now = stamp();

        assert!(task.toggle_done(now));
        assert_eq!(task.completed_at, Some(now));

        assert!(!task.toggle_done(now));
        assert!(task.completed_at.is_none());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category.as_deref(), Some("work"));
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_push_front_renumbers() {
        let mut list = TaskList::new();
        list.push_front(task(1, "first"));
        list.push_front(task(2, "second"));
        list.push_front(task(3, "third"));

        let texts: Vec<&str> = list.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
        assert_eq!(orders(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_push_front_bumps_duplicate_id() {
        let mut list = TaskList::new();
        let first = list.push_front(task(100, "a"));
        let second = list.push_front(task(100, "b"));

        assert_eq!(first, TaskId(100));
        assert_eq!(second, TaskId(101));
    }

    #[test]
    fn test_remove_renumbers_without_gaps() {
        let mut list = TaskList::new();
        for id in 1..=4 {
            list.push_front(task(id, "t"));
        }

        let (index, removed) = list.remove(TaskId(3)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id, TaskId(3));
        assert_eq!(orders(&list), vec![0, 1, 2]);
        assert!(list.remove(TaskId(3)).is_none());
    }

    #[test]
    fn test_insert_at_clamps_index() {
        let mut list = TaskList::new();
        list.push_front(task(1, "a"));
        list.insert_at(10, task(2, "b"));

        assert_eq!(list.position(TaskId(2)), Some(1));
        assert_eq!(orders(&list), vec![0, 1]);
    }

    #[test]
    fn test_insert_at_keeps_ids_unique() {
        let mut list = TaskList::new();
        list.push_front(task(1, "a"));
        list.push_front(task(2, "b"));

        let id = list.insert_at(1, task(1, "copy of a"));

        assert_eq!(id, TaskId(3));
        let ids: Vec<u64> = list.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_from_tasks_restores_order() {
        let tasks = vec![
            task(1, "c").with_order(7),
            task(2, "a").with_order(2),
            task(3, "b").with_order(5),
        ];
        let list = TaskList::from_tasks(tasks);

        let texts: Vec<&str> = list.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(orders(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_edit_fields() {
        let mut list = TaskList::new();
        list.push_front(task(1, "Old").with_due(
            NaiveDate::from_ymd_opt(2026, 10, 20),
            NaiveTime::from_hms_opt(9, 0, 0),
        ));

        let edit = TaskEdit {
            text: Some("  New text ".to_string()),
            priority: Some(Priority::Low),
            category: Some(Some("home".to_string())),
            due_date: Some(None),
            ..TaskEdit::default()
        };
        let task = list.edit(TaskId(1), edit).unwrap();

        assert_eq!(task.text, "New text");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.category.as_deref(), Some("home"));
        assert!(task.due_date.is_none());
        assert!(task.due_time.is_none());
    }

    #[test]
    fn test_edit_ignores_blank_text() {
        let mut list = TaskList::new();
        list.push_front(task(1, "Keep me"));

        let edit = TaskEdit {
            text: Some("   ".to_string()),
            ..TaskEdit::default()
        };
        assert_eq!(list.edit(TaskId(1), edit).unwrap().text, "Keep me");
        assert!(matches!(
            list.edit(TaskId(9), TaskEdit::default()),
            Err(CoreError::TaskNotFound(TaskId(9)))
        ));
    }

    #[test]
    fn test_categories_distinct_in_list_order() {
        let mut list = TaskList::new();
        list.push_front(task(1, "a").with_category(Some("work".to_string())));
        list.push_front(task(2, "b"));
        list.push_front(task(3, "c").with_category(Some("home".to_string())));
        list.push_front(task(4, "d").with_category(Some("work".to_string())));

        assert_eq!(list.categories(), vec!["work", "home"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut list = TaskList::new();
        list.push_front(
            task(1, "Buy milk")
                .with_priority(Priority::High)
                .with_category(Some("shopping".to_string()))
                .with_due(
                    NaiveDate::from_ymd_opt(2026, 10, 15),
                    NaiveTime::from_hms_opt(15, 30, 0),
                ),
        );
        let mut done = task(2, "Call mom");
        done.toggle_done(stamp());
        list.push_front(done);

        let json = serde_json::to_string(&list).unwrap();
        let parsed: TaskList = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, list);
        assert!(json.contains("\"dueDate\":\"2026-10-15\""));
        assert!(json.contains("\"priority\":\"high\""));
    }
}
