//! # Calendar Formatting
//!
//! Display formats used on order receipts, admin tables and date pickers.
//!
//! | Function                 | Example                   |
//! |--------------------------|---------------------------|
//! | [`format_date`]          | `20-April-2024`           |
//! | [`format_date_short`]    | `20-04-24`                |
//! | [`format_day_and_date`]  | `Saturday, 20-April-2024` |
//! | [`format_time_and_date`] | `14:05 20-04-24`          |
//! | [`format_date_picker`]   | `April 20th 2024`         |
//! | [`date_and_month`]       | `2004`                    |
//! | [`iso_date`]             | `2024-04-20` (UTC)        |
//!
//! Everything except [`iso_date`] renders in the configured local offset.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::error::{CoreResult, ValidationError};
use crate::rules::ScheduleRules;
use crate::validation::ValidationResult;

const DATE_PICKER_INPUT: &str = "%Y-%m-%d";

/// Converts milliseconds since the epoch (the stored order timestamp).
pub fn from_timestamp_millis(ms: i64) -> ValidationResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| ValidationError::OutOfRange {
        field: "timestamp".to_string(),
        min: DateTime::<Utc>::MIN_UTC.timestamp_millis(),
        max: DateTime::<Utc>::MAX_UTC.timestamp_millis(),
    })
}

fn render(ts: DateTime<Utc>, rules: &ScheduleRules, pattern: &str) -> CoreResult<String> {
    Ok(rules.local_time(ts)?.format(pattern).to_string())
}

pub fn format_date(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    render(ts, rules, "%d-%B-%Y")
}

pub fn format_date_short(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    render(ts, rules, "%d-%m-%y")
}

pub fn format_day_and_date(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    render(ts, rules, "%A, %d-%B-%Y")
}

pub fn format_time_and_date(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    render(ts, rules, "%H:%M %d-%m-%y")
}

/// Day/month stamp used in invoice numbers and order document ids.
pub fn date_and_month(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    render(ts, rules, "%d%m")
}

/// Long date with an English ordinal day, e.g. `April 1st 2024`.
pub fn format_date_picker(ts: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<String> {
    let local = rules.local_time(ts)?;
    Ok(format!(
        "{} {}{} {}",
        local.format("%B"),
        local.day(),
        ordinal_suffix(local.day()),
        local.year()
    ))
}

/// Returns the UTC calendar date as `YYYY-MM-DD`.
///
/// Deliberately UTC: it keys documents that other services read without
/// knowing the local offset.
pub fn iso_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Parses a date picker value (`YYYY-MM-DD`) into milliseconds at local
/// midnight.
///
/// ## Example
/// ```rust
/// use foodrun_core::calendar::timestamp_from_date_picker;
/// use foodrun_core::rules::ScheduleRules;
///
/// // Midnight 20 Apr 2024 in UTC+8 is 16:00 UTC the day before
/// let ms = timestamp_from_date_picker("2024-04-20", &ScheduleRules::default()).unwrap();
/// assert_eq!(ms, 1_713_542_400_000);
/// ```
pub fn timestamp_from_date_picker(value: &str, rules: &ScheduleRules) -> CoreResult<i64> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_PICKER_INPUT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("expected YYYY-MM-DD, got '{}'", value),
        }
    })?;

    let midnight = date.and_time(chrono::NaiveTime::MIN);
    let local = rules
        .timezone()?
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("'{}' has no local midnight", value),
        })?;

    Ok(local.timestamp_millis())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
