//! Application state
//!
//! The task list together with the single-slot undo buffer and the daily
//! analytics. Front ends own one `AppState` value and drive it through the
//! methods here; nothing in this crate touches storage.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::filter::FilterSpec;
use crate::stats::Analytics;
use crate::task::{Task, TaskEdit, TaskId, TaskList};

/// The most recently deleted task and the list index it had
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedTask {
    pub task: Task,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: TaskList,
    pub undo: Option<DeletedTask>,
    pub analytics: Analytics,
}

impl AppState {
    pub fn new(tasks: TaskList, undo: Option<DeletedTask>, analytics: Analytics) -> Self {
        Self {
            tasks,
            undo,
            analytics,
        }
    }

    /// Insert a freshly created task at the head of the list
    pub fn add(&mut self, task: Task) -> TaskId {
        let id = self.tasks.push_front(task);
        debug!(%id, "added task");
        id
    }

    /// Toggle completion; returns the new `done` value
    pub fn toggle(&mut self, id: TaskId, now: DateTime<Local>) -> Result<bool> {
        let done = self.tasks.get_mut_or_err(id)?.toggle_done(now);
        if done {
            self.analytics.record_completion();
        }
        debug!(%id, done, "toggled task");
        Ok(done)
    }

    pub fn edit(&mut self, id: TaskId, edit: TaskEdit) -> Result<&Task> {
        self.tasks.edit(id, edit)
    }

    /// Remove a task and remember it for [`AppState::undo_delete`]
    ///
    /// Any earlier undo opportunity is discarded.
    pub fn delete(&mut self, id: TaskId) -> Result<&Task> {
        let (index, task) = self.tasks.remove(id).ok_or(CoreError::TaskNotFound(id))?;
        debug!(%id, index, "deleted task");
        let slot = self.undo.insert(DeletedTask { task, index });
        Ok(&slot.task)
    }

    /// Put the last deleted task back at its original index
    ///
    /// The slot is emptied even when the task is already back in the list.
    pub fn undo_delete(&mut self) -> Result<TaskId> {
        let DeletedTask { task, index } = self.undo.take().ok_or(CoreError::NothingToUndo)?;
        if self.tasks.contains(task.id) {
            return Err(CoreError::validation(
                "undo",
                format!("Task #{} is already in the list", task.id),
            ));
        }
        let id = self.tasks.insert_at(index, task);
        debug!(%id, index, "restored task");
        Ok(id)
    }

    /// Swap in a whole new task list, e.g. one restored from a backup
    ///
    /// The undo slot refers to the old list and is discarded.
    pub fn replace_tasks(&mut self, tasks: TaskList) {
        self.tasks = tasks;
        self.undo = None;
        debug!(count = self.tasks.len(), "replaced task list");
    }

    /// Commit a manual reordering of the given ids
    pub fn reorder(&mut self, ids: &[TaskId]) -> Result<()> {
        self.tasks.reorder(ids)
    }

    pub fn reverse(&mut self) {
        self.tasks.reverse();
    }

    /// Tasks to display for a filter, in manual order
    pub fn view(&self, spec: &FilterSpec, now: NaiveDateTime) -> Vec<&Task> {
        spec.apply(self.tasks.iter(), now)
    }

    /// Distinct categories in list order
    pub fn categories(&self) -> Vec<&str> {
        self.tasks.categories()
    }

    /// First few categories, offered as shortcuts
    pub fn quick_categories(&self, limit: usize) -> Vec<&str> {
        let mut categories = self.categories();
        categories.truncate(limit);
        categories
    }

    /// Start of a session: reset daily counters if the day changed
    pub fn begin_session(&mut self, today: NaiveDate) {
        if self.analytics.roll_over(today) {
            debug!(%today, "reset daily analytics");
        }
        self.analytics.record_session();
    }

    /// True when there are tasks and none is pending
    pub fn all_done(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.count_pending() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    use crate::filter::View;
    use crate::parser::{ParseContext, create_task, parse};
    use crate::task::Priority;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 14, 10, 0, 0).unwrap()
    }

    fn add(state: &mut AppState, input: &str) -> TaskId {
        let ctx = ParseContext::new(now().naive_local(), Priority::Medium);
        state.add(create_task(parse(input, &ctx), now()))
    }

    fn texts(state: &AppState) -> Vec<&str> {
        state.tasks.iter().map(|t| t.text.as_str()).collect()
    }

    fn assert_dense(state: &AppState) {
        for (index, task) in state.tasks.iter().enumerate() {
            assert_eq!(task.order, index);
        }
    }

    #[test]
    fn test_add_inserts_at_head_with_unique_ids() {
        let mut state = AppState::default();
        let a = add(&mut state, "first");
        let b = add(&mut state, "second");

        assert_ne!(a, b);
        assert_eq!(texts(&state), vec!["second", "first"]);
        assert_dense(&state);
    }

    #[test]
    fn test_toggle_semantics() {
        let mut state = AppState::default();
        let id = add(&mut state, "Pay rent tomorrow #home !high");

        assert!(state.toggle(id, now()).unwrap());
        let task = state.tasks.get(id).unwrap();
        assert_eq!(task.completed_at, Some(now()));
        assert_eq!(state.analytics.completed_today, 1);

        assert!(!state.toggle(id, now()).unwrap());
        let task = state.tasks.get(id).unwrap();
        assert!(task.completed_at.is_none());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category.as_deref(), Some("home"));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 10, 15));

        assert!(matches!(
            state.toggle(TaskId(1), now()),
            Err(CoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_delete_and_undo_restores_position() {
        let mut state = AppState::default();
        add(&mut state, "c");
        let b = add(&mut state, "b");
        add(&mut state, "a");

        assert_eq!(state.delete(b).unwrap().text, "b");
        assert_eq!(texts(&state), vec!["a", "c"]);
        assert_dense(&state);

        assert_eq!(state.undo_delete().unwrap(), b);
        assert_eq!(texts(&state), vec!["a", "b", "c"]);
        assert_dense(&state);
        assert!(state.undo.is_none());
    }

    #[test]
    fn test_second_delete_discards_first_undo() {
        let mut state = AppState::default();
        let first = add(&mut state, "first");
        let second = add(&mut state, "second");

        state.delete(first).unwrap();
        state.delete(second).unwrap();

        assert_eq!(state.undo_delete().unwrap(), second);
        assert!(matches!(state.undo_delete(), Err(CoreError::NothingToUndo)));
        assert!(!state.tasks.contains(first));
    }

    #[test]
    fn test_replace_tasks_discards_undo() {
        let mut state = AppState::default();
        let a = add(&mut state, "a");
        add(&mut state, "b");
        let before_delete = state.tasks.clone();

        state.delete(a).unwrap();
        state.replace_tasks(before_delete);

        assert!(matches!(state.undo_delete(), Err(CoreError::NothingToUndo)));
        assert_eq!(state.tasks.len(), 2);
    }

    #[test]
    fn test_undo_refuses_task_already_present() {
        let mut state = AppState::default();
        let a = add(&mut state, "a");
        add(&mut state, "b");
        let before_delete = state.tasks.clone();

        state.delete(a).unwrap();
        // List restored without going through replace_tasks
        state.tasks = before_delete;

        assert!(matches!(
            state.undo_delete(),
            Err(CoreError::Validation { .. })
        ));
        assert!(state.undo.is_none());
        let ids: Vec<TaskId> = state.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.iter().filter(|id| **id == a).count(), 1);
    }

    #[test]
    fn test_reorder_then_view_follows_order() {
        let mut state = AppState::default();
        let c = add(&mut state, "c");
        let b = add(&mut state, "b");
        let a = add(&mut state, "a");

        state.reorder(&[c, a, b]).unwrap();
        let view = state.view(&FilterSpec::new(), now().naive_local());
        let ids: Vec<TaskId> = view.iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![c, a, b]);
        assert_dense(&state);
    }

    #[test]
    fn test_reorder_invariant_after_mixed_mutations() {
        let mut state = AppState::default();
        let ids: Vec<TaskId> = (0..6).map(|i| add(&mut state, &format!("task {}", i))).collect();

        state.delete(ids[2]).unwrap();
        state.reorder(&[ids[0], ids[5], ids[3]]).unwrap();
        add(&mut state, "late");
        state.undo_delete().unwrap();
        state.reverse();

        let mut orders: Vec<usize> = state.tasks.iter().map(|t| t.order).collect();
        orders.sort_unstable();
        assert_eq!(orders, (0..state.tasks.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_view_completed_and_all_done() {
        let mut state = AppState::default();
        let id = add(&mut state, "only task");
        assert!(!state.all_done());

        state.toggle(id, now()).unwrap();
        assert!(state.all_done());
        let done = state.view(&FilterSpec::new().view(View::Completed), now().naive_local());
        assert_eq!(done.len(), 1);
    }

    #[test]
    fn test_quick_categories() {
        let mut state = AppState::default();
        for name in ["a", "b", "c", "d", "e", "f"] {
            add(&mut state, &format!("task #{}", name));
        }

        assert_eq!(state.categories().len(), 6);
        assert_eq!(state.quick_categories(5), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn test_begin_session_rolls_over() {
        let mut state = AppState::default();
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        state.analytics.completed_today = 4;
        state.analytics.last_reset = today.pred_opt();

        state.begin_session(today);
        assert_eq!(state.analytics.completed_today, 0);
        assert_eq!(state.analytics.sessions, 1);
    }
}
