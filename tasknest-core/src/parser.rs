//! Natural language task parser
//!
//! Turns free text such as `"Buy milk tomorrow 3pm #shopping !high"` into a
//! [`ParsedTask`]. Extraction is an ordered pipeline of independent stages.
//! Each stage receives the text left over by the previous one, recognises at
//! most one token and returns it together with the residual text:
//!
//! 1. priority marker `!high`, `!medium`, `!low`
//! 2. category marker `#word`
//! 3. relative day `today` / `tomorrow`
//! 4. time of day `9`, `9:30`, `9pm`, `at 9:30pm`
//! 5. weekday name `monday` .. `sunday`
//!
//! The order is part of the behaviour. A `#42` category is gone before the
//! time stage runs, and a weekday found in stage 5 replaces a date set in
//! stage 3.

use std::sync::LazyLock;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::debug;

use crate::date::{next_weekday, weekday_from_name};
use crate::error::{CoreError, Result};
use crate::task::{Priority, Task, TaskId};

// Regex patterns are compile-time constants - invalid patterns are programming errors
static PRIORITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)!(high|medium|low)\b").expect("Invalid priority regex pattern")
});

static CATEGORY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("Invalid category regex pattern"));

static TODAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btoday\b").expect("Invalid today regex pattern"));

static TOMORROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").expect("Invalid tomorrow regex pattern"));

// H, H:MM, optional am/pm, optionally introduced by "at"
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bat\s+)?([0-9]{1,2})(?::([0-9]{2}))?(?:\s*(am|pm)\b)?")
        .expect("Invalid time regex pattern")
});

static WEEKDAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b")
        .expect("Invalid weekday regex pattern")
});

/// Ambient inputs of a parse: the current local time and the configured
/// default priority
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    pub now: NaiveDateTime,
    pub default_priority: Priority,
}

impl ParseContext {
    pub fn new(now: NaiveDateTime, default_priority: Priority) -> Self {
        Self {
            now,
            default_priority,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// Fields recognised in a raw input string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTask {
    /// Display text with every recognised token removed
    pub text: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
}

impl ParsedTask {
    /// True when every word was consumed by a rule, e.g. input `"tomorrow"`
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Output of one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub value: Option<T>,
    /// Input text with the matched token removed
    pub rest: String,
}

impl<T> Extraction<T> {
    fn found(value: T, rest: String) -> Self {
        Self {
            value: Some(value),
            rest,
        }
    }

    fn none(text: &str) -> Self {
        Self {
            value: None,
            rest: text.to_string(),
        }
    }
}

/// Reject input that has no text at all
///
/// Returns the trimmed input. The parser itself accepts anything.
pub fn validate_input(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("text", "Task text cannot be empty"));
    }
    Ok(trimmed)
}

/// Parse raw task input. Never fails; unmatched rules leave defaults.
pub fn parse(raw: &str, ctx: &ParseContext) -> ParsedTask {
    let today = ctx.today();

    let priority = extract_priority(&tidy(raw));
    let category = extract_category(&priority.rest);
    let relative = extract_relative_day(&category.rest, today);
    let time = extract_time(&relative.rest);
    let weekday = extract_weekday(&time.rest, today);

    let parsed = ParsedTask {
        text: weekday.rest,
        priority: priority.value.unwrap_or(ctx.default_priority),
        category: category.value,
        // Last applied rule wins
        due_date: weekday.value.or(relative.value),
        due_time: time.value,
    };
    debug!(?parsed, "parsed task input");
    parsed
}

/// Stamp a parsed result into a detached task
///
/// The id derives from the creation time in milliseconds; the list bumps it
/// on insert if it collides. `order` is renumbered on insert.
pub fn create_task(parsed: ParsedTask, now: DateTime<Local>) -> Task {
    let id = TaskId(u64::try_from(now.timestamp_millis()).unwrap_or_default());
    Task::new(id, parsed.text, now)
        .with_priority(parsed.priority)
        .with_category(parsed.category)
        .with_due(parsed.due_date, parsed.due_time)
}

/// Stage 1: `!high`, `!medium` or `!low`, anywhere, case-insensitive
pub fn extract_priority(text: &str) -> Extraction<Priority> {
    let Some(caps) = PRIORITY_REGEX.captures(text) else {
        return Extraction::none(text);
    };
    let (Some(whole), Some(level)) = (caps.get(0), caps.get(1)) else {
        return Extraction::none(text);
    };
    match level.as_str().parse::<Priority>() {
        Ok(priority) => Extraction::found(priority, strip(text, whole.start(), whole.end())),
        Err(_) => Extraction::none(text),
    }
}

/// Stage 2: first `#word`, case preserved
pub fn extract_category(text: &str) -> Extraction<String> {
    let Some(caps) = CATEGORY_REGEX.captures(text) else {
        return Extraction::none(text);
    };
    match (caps.get(0), caps.get(1)) {
        (Some(whole), Some(name)) => Extraction::found(
            name.as_str().to_string(),
            strip(text, whole.start(), whole.end()),
        ),
        _ => Extraction::none(text),
    }
}

/// Stage 3: whole-word `today`, otherwise whole-word `tomorrow`
///
/// Only one keyword is consumed; `today` is checked first.
pub fn extract_relative_day(text: &str, today: NaiveDate) -> Extraction<NaiveDate> {
    if let Some(m) = TODAY_REGEX.find(text) {
        return Extraction::found(today, strip(text, m.start(), m.end()));
    }
    if let Some(m) = TOMORROW_REGEX.find(text) {
        if let Some(tomorrow) = today.checked_add_days(Days::new(1)) {
            return Extraction::found(tomorrow, strip(text, m.start(), m.end()));
        }
    }
    Extraction::none(text)
}

/// Stage 4: first valid `H`, `H:MM`, `Ham`, `H:MMpm` anywhere in the text
///
/// Any bare number qualifies, so `"Buy 2 apples"` yields 02:00. Numbers
/// that are not a time of day (`25`, `9:75`) or that sit inside a longer
/// digit run (`250`) are skipped and stay in the text.
pub fn extract_time(text: &str) -> Extraction<NaiveTime> {
    let found = TIME_REGEX.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let hour_match = caps.get(1)?;
        let number_end = caps.get(2).unwrap_or(hour_match).end();
        if digit_before(text, hour_match.start()) || digit_at(text, number_end) {
            return None;
        }

        let hour = hour_match.as_str().parse::<u32>().ok()?;
        let minute = match caps.get(2) {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => 0,
        };
        let time = to_time(hour, minute, caps.get(3).map(|m| m.as_str()))?;
        Some((time, whole.start(), whole.end()))
    });

    match found {
        Some((time, start, end)) => Extraction::found(time, strip(text, start, end)),
        None => Extraction::none(text),
    }
}

fn digit_before(text: &str, index: usize) -> bool {
    text[..index].chars().next_back().is_some_and(|c| c.is_ascii_digit())
}

fn digit_at(text: &str, index: usize) -> bool {
    text[index..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Stage 5: whole-word weekday name, resolved to its next occurrence
pub fn extract_weekday(text: &str, today: NaiveDate) -> Extraction<NaiveDate> {
    let Some(m) = WEEKDAY_REGEX.find(text) else {
        return Extraction::none(text);
    };
    match weekday_from_name(m.as_str()) {
        Some(weekday) => Extraction::found(
            next_weekday(today, weekday),
            strip(text, m.start(), m.end()),
        ),
        None => Extraction::none(text),
    }
}

fn to_time(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem.map(str::to_lowercase).as_deref() {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Remove `text[start..end]` and tidy the whitespace around the gap
fn strip(text: &str, start: usize, end: usize) -> String {
    tidy(&format!("{} {}", &text[..start], &text[end..]))
}

fn tidy(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
