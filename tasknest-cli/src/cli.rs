use clap::{Parser, Subcommand, ValueEnum};

use tasknest_core::{Priority, TaskId, View};

#[derive(Parser)]
#[command(name = "tasknest")]
#[command(about = concat!(
    "  _            _                  _   \n",
    " | |_ __ _ ___| | ___ __  ___ ___| |_ \n",
    " |  _/ _` (_-<| / / '  \\/ -_|_-<  _|\n",
    "  \\__\\__,_/__/|_\\_\\_||_\\___/__/\\__|\n",
    "~Type it like you say it: \"Pay rent tomorrow #home !high\"~"
))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    "\nCodeName: ",
    env!("CODENAME")
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ViewArg {
    /// Every task that is not done
    #[default]
    All,
    /// Due today
    Today,
    /// Due within the next seven days
    Week,
    /// Past due and not done
    Overdue,
    /// Done
    Completed,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::All => View::All,
            ViewArg::Today => View::Today,
            ViewArg::Week => View::Week,
            ViewArg::Overdue => View::Overdue,
            ViewArg::Completed => View::Completed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

fn parse_task_id(s: &str) -> Result<TaskId, String> {
    s.trim_start_matches('#')
        .parse::<u64>()
        .map(TaskId)
        .map_err(|e| format!("invalid task id '{}': {}", s, e))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Adds a task from natural text, e.g. "Call mom at 3pm #family !high"
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Lists tasks in manual order
    List {
        /// Which tasks to show
        #[arg(long, short = 'v', value_enum, default_value = "all")]
        view: ViewArg,
        /// Only tasks in this category
        #[arg(long, short = 'C', value_name = "CATEGORY")]
        category: Option<String>,
        /// Only tasks with this priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// Filter tasks containing text (case-insensitive)
        #[arg(long, short = 's', value_name = "TERM")]
        search: Option<String>,
        /// Use compact one-line format
        #[arg(long, short = 'c', conflicts_with = "detailed")]
        compact: bool,
        /// Use detailed format with full info
        #[arg(long)]
        detailed: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Toggles task completion status
    Check {
        #[arg(value_parser = parse_task_id)]
        id: TaskId,
    },

    /// Removes a task (restore it with `undo`)
    Remove {
        #[arg(value_parser = parse_task_id)]
        id: TaskId,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Restores the most recently removed task
    Undo,

    /// Edit a task's fields
    Edit {
        #[arg(value_parser = parse_task_id)]
        id: TaskId,
        /// New task text
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
        /// New priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// New category (use 'none' to clear)
        #[arg(long, short = 'C', value_name = "CATEGORY")]
        category: Option<String>,
        /// New due date (use 'none' to clear)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// New due time such as 15:00 or 3pm (use 'none' to clear)
        #[arg(long, value_name = "TIME")]
        time: Option<String>,
    },

    /// Moves the given tasks, in the given sequence, into the slots they occupy
    Move {
        #[arg(required = true, num_args = 1.., value_parser = parse_task_id)]
        ids: Vec<TaskId>,
    },

    /// Reverses the manual order of all tasks
    Reverse,

    /// List all categories
    Categories,

    /// Show task counts and today's progress
    Stats {
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Recover tasks from backup file
    Recover {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}
