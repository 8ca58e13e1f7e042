//! Task display formatting module
//!
//! Handles colored output and different view modes for tasks

use chrono::{NaiveDateTime, Timelike};
use colored::*;

use tasknest_core::date::format_date_human;
use tasknest_core::filter::is_overdue;
use tasknest_core::{Analytics, Priority, Task, TaskStats};

/// Display mode for task list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Minimal one-line format
    Compact,
    /// Full info with formatted dates
    Detailed,
    /// Balanced view with clear status indicators (default)
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn paint_priority(priority: Priority, text: String, use_color: bool) -> String {
    if !use_color {
        return text;
    }
    match priority {
        Priority::High => text.red().bold().to_string(),
        Priority::Medium => text.yellow().to_string(),
        Priority::Low => text.green().to_string(),
    }
}

/// "(Tomorrow 15:00)" style due label, colored by urgency
fn due_label(task: &Task, now: NaiveDateTime, use_color: bool) -> Option<String> {
    let date = task.due_date?;
    let today = now.date();
    let mut label = format_date_human(date, today);
    if let Some(time) = task.due_time {
        label.push_str(&format!(" {}", time.format("%H:%M")));
    }
    let label = format!("({})", label);

    if !use_color {
        return Some(label);
    }
    let days = date.signed_duration_since(today).num_days();
    let label = if task.done {
        label.green().to_string()
    } else if is_overdue(task, now) {
        label.red().bold().to_string()
    } else if days <= 1 {
        label.yellow().to_string()
    } else {
        label.normal().to_string()
    };
    Some(label)
}

/// Format a task for display
pub fn format_task(task: &Task, mode: DisplayMode, use_color: bool, now: NaiveDateTime) -> String {
    let checkbox = if task.done { "[✓]" } else { "[ ]" };

    let text = if use_color && task.done {
        task.text.dimmed().strikethrough().to_string()
    } else {
        task.text.clone()
    };

    let category = match &task.category {
        Some(cat) if use_color => format!(" #{}", cat).magenta().to_string(),
        Some(cat) => format!(" #{}", cat),
        None => String::new(),
    };

    match mode {
        DisplayMode::Compact => {
            format!("{} [{}] {}{}", checkbox, task.id, text, category)
        }
        DisplayMode::Detailed => {
            let mut parts = vec![
                format!("{} [ID: {}]", checkbox, task.id),
                format!("Text: {}", text),
                format!(
                    "Priority: {}",
                    paint_priority(task.priority, task.priority.to_string(), use_color)
                ),
                format!("Category: {}", task.category.as_deref().unwrap_or("(none)")),
            ];

            match task.due_date {
                Some(date) => {
                    let time = task
                        .due_time
                        .map(|t| format!(" {}", t.format("%H:%M")))
                        .unwrap_or_default();
                    let label = due_label(task, now, use_color).unwrap_or_default();
                    parts.push(format!("Due: {}{} {}", date.format("%Y-%m-%d"), time, label));
                }
                None => parts.push("Due: (none)".to_string()),
            }

            parts.push(format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M")));
            match task.completed_at {
                Some(at) => parts.push(format!("Completed: {}", at.format("%Y-%m-%d %H:%M"))),
                None => parts.push("Status: Pending".to_string()),
            }
            parts.join("\n  ")
        }
        DisplayMode::Default => {
            let id_str = if use_color {
                format!("[{}]", task.id).cyan().to_string()
            } else {
                format!("[{}]", task.id)
            };
            let marker = paint_priority(task.priority, "●".to_string(), use_color);

            let mut line = format!("{} {} {} {}{}", checkbox, marker, id_str, text, category);
            if let Some(label) = due_label(task, now, use_color) {
                line.push(' ');
                line.push_str(&label);
            }
            if is_overdue(task, now) {
                line.push_str(if use_color { " ⚠" } else { " [overdue]" });
            }
            line
        }
    }
}

/// Format a summary line for task list
pub fn format_summary(stats: &TaskStats, use_color: bool) -> String {
    let parts = vec![
        format!("{} total", stats.total),
        if use_color {
            format!("{} done", stats.done).green().to_string()
        } else {
            format!("{} done", stats.done)
        },
        format!("{} pending", stats.pending),
        if stats.overdue > 0 {
            if use_color {
                format!("{} overdue", stats.overdue).red().to_string()
            } else {
                format!("{} overdue", stats.overdue)
            }
        } else {
            String::new()
        },
    ];

    let summary: Vec<&str> = parts.iter().filter(|s| !s.is_empty()).map(|s| s.as_str()).collect();

    format!("[{}]", summary.join(" | "))
}

/// Multi-line breakdown for the `stats` command
pub fn format_stats(stats: &TaskStats, analytics: &Analytics, use_color: bool) -> String {
    let mut lines = vec![format_summary(stats, use_color), String::new()];
    lines.push("Pending by priority:".to_string());
    for priority in Priority::ALL {
        let label = paint_priority(priority, format!("{:<6}", priority.as_str()), use_color);
        lines.push(format!("  {} {}", label, stats.pending_with(priority)));
    }
    lines.push(String::new());
    lines.push(format!("Completed today: {}", analytics.completed_today));
    lines.push(format!("Sessions today:  {}", analytics.sessions));
    lines.join("\n")
}

/// Ideas shown when there is nothing to list, depending on the hour
pub fn suggestions_for_hour(hour: u32) -> [&'static str; 3] {
    match hour {
        5..=11 => ["Morning coffee", "Check emails", "Morning exercise"],
        12..=16 => ["Lunch break", "Important calls", "Meeting prep"],
        17..=20 => ["Dinner plans", "Reading time", "Evening routine"],
        _ => ["Bedtime routine", "Tomorrow planning", "Wind down"],
    }
}

/// Empty-state message with a few suggestions
pub fn format_empty(now: NaiveDateTime) -> String {
    let mut lines = vec!["No tasks found.".to_string(), "Quick suggestions:".to_string()];
    for suggestion in suggestions_for_hour(now.hour()) {
        lines.push(format!("  tasknest add \"{}\"", suggestion));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

    use tasknest_core::TaskId;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn task(id: u64, text: &str) -> Task {
        let stamp = Local.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        Task::new(TaskId(id), text, stamp)
    }

    #[test]
    fn test_format_task_compact() {
        let task = task(1, "Test task").with_category(Some("work".to_string()));

        let output = format_task(&task, DisplayMode::Compact, false, now());
        assert_eq!(output, "[ ] [1] Test task #work");
    }

    #[test]
    fn test_format_task_completed() {
        let task = task(2, "Done task").with_done(true);

        let output = format_task(&task, DisplayMode::Default, false, now());
        assert!(output.contains("[✓]"));
    }

    #[test]
    fn test_format_task_due_label() {
        let task = task(3, "Call mom").with_due(
            NaiveDate::from_ymd_opt(2026, 10, 15),
            NaiveTime::from_hms_opt(15, 0, 0),
        );

        let output = format_task(&task, DisplayMode::Default, false, now());
        assert!(output.contains("(Tomorrow 15:00)"));
        assert!(!output.contains("[overdue]"));
    }

    #[test]
    fn test_format_task_flags_overdue() {
        let task = task(4, "File taxes").with_due(NaiveDate::from_ymd_opt(2026, 10, 10), None);

        let output = format_task(&task, DisplayMode::Default, false, now());
        assert!(output.contains("[overdue]"));
        assert!(output.contains("Overdue (4 days ago)"));
    }

    #[test]
    fn test_format_task_detailed() {
        let task = task(5, "Report").with_priority(Priority::High);

        let output = format_task(&task, DisplayMode::Detailed, false, now());
        assert!(output.contains("Priority: high"));
        assert!(output.contains("Category: (none)"));
        assert!(output.contains("Due: (none)"));
        assert!(output.contains("Status: Pending"));
    }

    #[test]
    fn test_format_summary() {
        let stats = TaskStats {
            total: 10,
            done: 5,
            pending: 5,
            overdue: 2,
            ..TaskStats::default()
        };
        let summary = format_summary(&stats, false);
        assert!(summary.contains("10 total"));
        assert!(summary.contains("5 done"));
        assert!(summary.contains("2 overdue"));

        let calm = TaskStats::default();
        assert!(!format_summary(&calm, false).contains("overdue"));
    }

    #[test]
    fn test_suggestions_follow_hour() {
        assert_eq!(suggestions_for_hour(8)[0], "Morning coffee");
        assert_eq!(suggestions_for_hour(12)[0], "Lunch break");
        assert_eq!(suggestions_for_hour(20)[0], "Dinner plans");
        assert_eq!(suggestions_for_hour(2)[0], "Bedtime routine");
        assert!(format_empty(now()).contains("Morning coffee"));
    }
}
