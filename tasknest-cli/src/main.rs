use std::io::{self, Write};

use chrono::Local;
use clap::Parser;
use tracing::debug;

use tasknest_core::date::{parse_date, parse_time};
use tasknest_core::parser::validate_input;
use tasknest_core::{FilterSpec, ParseContext, TaskEdit, TaskStats, View, create_task, parse};

use crate::cli::{Cli, Commands};
use crate::config::{APP_NAME, Config};
use crate::display::{
    DisplayMode, format_empty, format_stats, format_summary, format_task, supports_color,
};
use crate::error::{CliError, Result};
use crate::storage::{ANALYTICS_KEY, JsonStore};

mod cli;
mod config;
mod display;
mod error;
mod storage;

const QUICK_CATEGORY_LIMIT: usize = 5;

fn main() -> Result<()> {
    if std::env::var("TASKNEST_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("tasknest_cli=debug,tasknest_core=debug")
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let cfg: Config = confy::load(APP_NAME, None)?;
    let store = JsonStore::new(&cfg.data_directory);
    debug!(dir = %store.dir().display(), "using data directory");

    let mut state = store.load_state()?;
    let now = Local::now();
    let wall_clock = now.naive_local();
    state.begin_session(wall_clock.date());

    match cli.command {
        Commands::Add { text } => {
            let raw = text.join(" ");
            let raw = validate_input(&raw)?;
            let ctx = ParseContext::new(wall_clock, cfg.default_priority);
            let parsed = parse(raw, &ctx);
            if parsed.is_empty() {
                return Err(CliError::validation(
                    "text",
                    "Nothing left after extracting date, time, category and priority",
                ));
            }

            let id = state.add(create_task(parsed, now));
            store.save_state(&state)?;

            let use_color = supports_color();
            let task = state.tasks.get_or_err(id)?;
            println!("Task added:");
            println!("{}", format_task(task, DisplayMode::Default, use_color, wall_clock));
        }

        Commands::List {
            view,
            category,
            priority,
            search,
            compact,
            detailed,
            no_color,
        } => {
            let spec = FilterSpec::new()
                .view(view.into())
                .with_category(category.filter(|c| !c.eq_ignore_ascii_case("none")))
                .with_priority(priority.map(Into::into))
                .with_search(search);
            let tasks = state.view(&spec, wall_clock);

            if tasks.is_empty() {
                if state.tasks.is_empty() {
                    println!("{}", format_empty(wall_clock));
                } else if state.all_done() && spec.view == View::All && !spec.is_narrowed() {
                    println!("All done! Nothing left to do.");
                } else {
                    println!("No tasks found.");
                }
            } else {
                // Determine display mode
                let mode = if compact {
                    DisplayMode::Compact
                } else if detailed {
                    DisplayMode::Detailed
                } else {
                    DisplayMode::Default
                };

                let use_color = !no_color && supports_color();

                for task in &tasks {
                    println!("{}", format_task(task, mode, use_color, wall_clock));
                }

                // Show summary
                println!();
                let stats = TaskStats::compute(tasks.iter().copied(), wall_clock);
                println!("{}", format_summary(&stats, use_color));
            }
            store.set(ANALYTICS_KEY, &state.analytics)?;
        }

        Commands::Check { id } => {
            let done = state.toggle(id, now)?;
            let task = state.tasks.get_or_err(id)?;
            let status = if done { "done" } else { "open" };
            println!("Marked task #{} as {}: {}", task.id, status, task.text);
            let all_done = done && state.all_done();
            store.save_state(&state)?;
            if all_done {
                println!("All done! Nothing left to do.");
            }
        }

        Commands::Remove { id, force } => {
            let text = state.tasks.get_or_err(id)?.text.clone();
            if cfg.confirm_delete && !force && !confirm(&format!("Remove task #{} '{}'?", id, text))? {
                println!("Cancelled.");
                return Ok(());
            }

            let removed = state.delete(id)?;
            println!("Removed: {} (run `tasknest undo` to restore)", removed.text);
            store.save_state(&state)?;
        }

        Commands::Undo => {
            let id = state.undo_delete()?;
            let task = state.tasks.get_or_err(id)?;
            println!("Restored task #{}: {}", task.id, task.text);
            store.save_state(&state)?;
        }

        Commands::Edit {
            id,
            text,
            priority,
            category,
            due,
            time,
        } => {
            let today = wall_clock.date();
            let edit = TaskEdit {
                text,
                priority: priority.map(Into::into),
                category: category.map(|c| none_or(&c).map(|c| c.trim_start_matches('#').to_string())),
                due_date: due
                    .map(|d| none_or(&d).map(|d| parse_date(d, today)).transpose())
                    .transpose()?,
                due_time: time
                    .map(|t| none_or(&t).map(parse_time).transpose())
                    .transpose()?,
            };

            if edit.is_empty() {
                return Err(CliError::validation(
                    "edit",
                    "At least one of --text, --priority, --category, --due or --time must be provided",
                ));
            }

            let current = state.tasks.get_or_err(id)?;
            let sets_time = matches!(edit.due_time, Some(Some(_)));
            let has_date = match edit.due_date {
                Some(date) => date.is_some(),
                None => current.due_date.is_some(),
            };
            if sets_time && !has_date {
                return Err(CliError::validation("time", "Set a due date with --due first"));
            }

            let task = state.edit(id, edit)?;
            println!("Updated task #{}:", task.id);
            println!(
                "{}",
                format_task(task, DisplayMode::Detailed, supports_color(), wall_clock)
            );
            store.save_state(&state)?;
        }

        Commands::Move { ids } => {
            state.reorder(&ids)?;
            store.save_state(&state)?;
            println!("Reordered {} task(s).", ids.len());
        }

        Commands::Reverse => {
            state.reverse();
            store.save_state(&state)?;
            println!("Reversed {} task(s).", state.tasks.len());
        }

        Commands::Categories => {
            let categories = state.categories();
            if categories.is_empty() {
                println!("No categories yet. Add one with #name in a task.");
            } else {
                let quick = state.quick_categories(QUICK_CATEGORY_LIMIT);
                println!("Quick categories: {}", quick.join(", "));
                println!();
                for category in categories {
                    let count = state
                        .tasks
                        .iter()
                        .filter(|t| t.category.as_deref() == Some(category))
                        .count();
                    println!("  #{} ({})", category, count);
                }
            }
            store.set(ANALYTICS_KEY, &state.analytics)?;
        }

        Commands::Stats { no_color } => {
            let stats = TaskStats::compute(&state.tasks, wall_clock);
            let use_color = !no_color && supports_color();
            println!("{}", format_stats(&stats, &state.analytics, use_color));
            store.set(ANALYTICS_KEY, &state.analytics)?;
        }

        Commands::Recover { force } => {
            if !store.backup_exists() {
                return Err(CliError::storage("No backup file found"));
            }

            if !force && !confirm("Restore tasks from backup? Current tasks will be replaced.")? {
                println!("Cancelled.");
                return Ok(());
            }

            let recovered = store.recover()?;
            let count = recovered.len();
            state.replace_tasks(recovered);
            store.save_state(&state)?;
            println!("Recovered {} tasks from backup.", count);
        }
    }

    Ok(())
}

/// `None` for the literal "none", otherwise the trimmed value
fn none_or(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}

/// Ask user for confirmation
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}
