//! Date helpers
//!
//! Date arguments for editing commands, weekday arithmetic shared with the
//! task parser, and human-readable formatting. "Today" is always passed in
//! so results are deterministic.
//!
//! Supported argument formats:
//! - Relative: "today", "tomorrow", "yesterday"
//! - Weekdays: "monday", "fri", "next friday"
//! - Offset: "in 3 days", "in 1 week"
//! - ISO dates: "2026-01-25"
//! - Human dates: "Jan 25", "January 25 2026", "01/25/2026", "25 Jan 2026"

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{CoreError, Result};

/// Parse a date argument relative to `today`
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();

    if let Some(date) = try_parse_relative(&input, today) {
        return Ok(date);
    }

    if let Some(date) = try_parse_weekday(&input, today) {
        return Ok(date);
    }

    if let Some(date) = try_parse_offset(&input, today) {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Ok(date);
    }

    let with_year = [
        "%b %d %Y", // Jan 25 2026
        "%B %d %Y", // January 25 2026
        "%m/%d/%Y", // 01/25/2026
        "%d %b %Y", // 25 Jan 2026
        "%d %B %Y", // 25 January 2026
    ];
    for format in &with_year {
        if let Ok(date) = NaiveDate::parse_from_str(&input, format) {
            return Ok(date);
        }
    }

    // Without a year: assume this year, or next year once the date has passed
    let without_year = [("%b %d %Y", ' '), ("%B %d %Y", ' '), ("%m/%d/%Y", '/')];
    for (format, separator) in &without_year {
        let this_year = format!("{}{}{}", input, separator, today.year());
        if let Ok(date) = NaiveDate::parse_from_str(&this_year, format) {
            if date >= today {
                return Ok(date);
            }
            return date
                .with_year(today.year() + 1)
                .ok_or_else(|| CoreError::parse("Invalid date"));
        }
    }

    Err(CoreError::parse(format!(
        "Could not parse date '{}'. Try formats like: 'tomorrow', 'Jan 25', '2026-01-25', 'next monday', 'in 3 days'",
        input
    )))
}

/// Parse a wall-clock time argument such as "15:00", "9am" or "9:30pm"
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let mut input = input.trim().to_lowercase().replace(' ', "");
    // chrono needs minutes, so "9am" becomes "9:00am"
    if !input.contains(':') {
        let digits_end = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        input.insert_str(digits_end, ":00");
    }

    let formats = ["%H:%M", "%I:%M%p"];
    let mut last_err = None;
    for format in &formats {
        match NaiveTime::parse_from_str(&input, format) {
            Ok(time) => return Ok(time),
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(e) => Err(CoreError::parse_with_source(
            format!("Could not parse time '{}'. Try '15:00' or '3pm'", input),
            e,
        )),
        None => Err(CoreError::parse("Empty time")),
    }
}

fn try_parse_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    }
}

fn try_parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    // "next <weekday>" and "<weekday>" both mean the next occurrence after today
    let weekday_str = input.strip_prefix("next ").unwrap_or(input);
    let target = weekday_from_name(weekday_str)?;
    Some(next_weekday(today, target))
}

fn try_parse_offset(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let rest = input.strip_prefix("in ")?.trim();
    let parts: Vec<&str> = rest.split_whitespace().collect();

    if parts.len() != 2 {
        return None;
    }

    let num: u64 = parts[0].parse().ok()?;

    match parts[1] {
        "day" | "days" => today.checked_add_days(Days::new(num)),
        "week" | "weeks" => num
            .checked_mul(7)
            .and_then(|days| today.checked_add_days(Days::new(days))),
        _ => None,
    }
}

/// Weekday from a full or abbreviated English name (case-insensitive)
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name.to_lowercase().as_str() {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Days from `today` until the next `target` weekday, in `1..=7`
///
/// When today already is `target` the answer is 7, never 0.
pub fn days_until_weekday(today: Weekday, target: Weekday) -> u64 {
    let offset = (target.num_days_from_sunday() + 7 - today.num_days_from_sunday()) % 7;
    if offset == 0 { 7 } else { u64::from(offset) }
}

/// The next date strictly after `today` falling on `target`
pub fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let offset = days_until_weekday(today.weekday(), target);
    today + Days::new(offset)
}

/// Local wall-clock instant a task is due: the date at `time`, or midnight
pub fn due_instant(date: NaiveDate, time: Option<NaiveTime>) -> NaiveDateTime {
    date.and_time(time.unwrap_or(NaiveTime::MIN))
}

/// Format a NaiveDate for human-readable display
///
/// Returns strings like: "Today", "Tomorrow", "Mon Jan 27", "Overdue (3 days ago)"
pub fn format_date_human(date: NaiveDate, today: NaiveDate) -> String {
    let diff = date.signed_duration_since(today).num_days();

    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=6 => date.format("%a %b %d").to_string(),
        7..=365 => date.format("%b %d").to_string(),
        _ if diff < 0 => format!("Overdue ({} days ago)", -diff),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}
