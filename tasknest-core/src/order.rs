//! Manual ordering of the task list
//!
//! `order` is dense: after any function here runs, the values across the
//! list are exactly `0..n-1` and match list position.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::task::{Task, TaskId};

/// Set every task's `order` to its list index
pub fn renumber(tasks: &mut [Task]) {
    for (index, task) in tasks.iter_mut().enumerate() {
        task.order = index;
    }
}

/// Commit a drag-and-drop permutation
///
/// The listed tasks are written back into the slots they occupied before,
/// in the sequence given by `ids`. Tasks not listed keep their slots, so a
/// permutation of a filtered view only moves visible tasks among
/// themselves. A permutation of the whole list makes each task's `order`
/// its position in `ids`.
///
/// Unknown or repeated ids leave the list untouched.
pub fn reorder(tasks: &mut Vec<Task>, ids: &[TaskId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut slots = Vec::with_capacity(ids.len());

    for &id in ids {
        if !seen.insert(id) {
            return Err(CoreError::validation(
                "order",
                format!("Task #{} listed more than once", id),
            ));
        }
        let slot = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::TaskNotFound(id))?;
        slots.push(slot);
    }
    slots.sort_unstable();

    let mut moved: Vec<Option<Task>> = std::mem::take(tasks).into_iter().map(Some).collect();
    let picked: Vec<Task> = ids
        .iter()
        .filter_map(|id| {
            moved
                .iter_mut()
                .find(|slot| matches!(slot, Some(t) if t.id == *id))
                .and_then(Option::take)
        })
        .collect();

    for (slot, task) in slots.into_iter().zip(picked) {
        moved[slot] = Some(task);
    }

    *tasks = moved.into_iter().flatten().collect();
    renumber(tasks);
    debug!(count = ids.len(), "reordered tasks");
    Ok(())
}

/// Reverse the whole list and renumber
pub fn reverse(tasks: &mut [Task]) {
    tasks.reverse();
    renumber(tasks);
}
