//! TaskNest Core - Pure domain logic for quick-capture task tracking
//!
//! This crate contains no I/O operations. All persistence
//! is handled by adapters in consuming crates.

pub mod date;
pub mod error;
pub mod filter;
pub mod order;
pub mod parser;
pub mod state;
pub mod stats;
pub mod task;

pub use error::{CoreError, Result};
pub use filter::{FilterExt, FilterSpec, View};
pub use parser::{ParseContext, ParsedTask, create_task, parse};
pub use state::{AppState, DeletedTask};
pub use stats::{Analytics, TaskStats};
pub use task::{Priority, Task, TaskEdit, TaskId, TaskList};
