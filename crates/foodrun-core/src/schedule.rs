//! # Schedule Module
//!
//! The time-window evaluator: which delivery slots can still be ordered,
//! whether ordering has closed for the day, and calendar predicates.
//!
//! ## Slot Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  now (UTC) ──► local time (rules.utc_offset_minutes)                   │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │        time-of-day + lead buffer (70 min)                               │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │   strictly before slot.order_by? ──► yes: slot offered                  │
//! │                                 └──► no:  slot dropped                  │
//! │                                                                         │
//! │  10:00 + 70 min = 11:10   vs  order-by 11:05  →  dropped               │
//! │  10:00 + 70 min = 11:10   vs  order-by 11:30  →  offered               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Comparisons are time-of-day only. The buffered time does not wrap past
//! midnight, so a late request drops every slot instead of reopening the
//! morning ones; callers only ever pass same-day slots.
//!
//! Nothing here reads the wall clock: `now` is always a parameter.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};

use crate::error::{CoreResult, ValidationError};
use crate::rules::ScheduleRules;
use crate::types::{DeliverySlot, MonthDay};
use crate::validation::ValidationResult;

/// How long before a slot the market pickup run leaves.
const MILK_RUN_LEAD_MINUTES: i64 = 45;

// =============================================================================
// Slot Window
// =============================================================================

/// Checks whether one slot can still be ordered at `now`.
pub fn is_slot_open(
    now: DateTime<Utc>,
    slot: &DeliverySlot,
    rules: &ScheduleRules,
) -> CoreResult<bool> {
    let local = rules.local_time(now)?;
    let earliest = i64::from(local.time().num_seconds_from_midnight())
        + rules.lead_buffer()?.num_seconds();
    let cutoff = i64::from(slot.order_by.num_seconds_from_midnight());

    Ok(earliest < cutoff)
}

/// Returns the slots that are still orderable, preserving catalog order.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveTime, TimeZone, Utc};
/// use foodrun_core::rules::ScheduleRules;
/// use foodrun_core::schedule::evaluate_slot_window;
/// use foodrun_core::types::DeliverySlot;
///
/// let slots = vec![
///     DeliverySlot::new(NaiveTime::from_hms_opt(11, 5, 0).unwrap(), "early"),
///     DeliverySlot::new(NaiveTime::from_hms_opt(14, 0, 0).unwrap(), "3 - 5"),
/// ];
/// // 02:00 UTC is 10:00 in UTC+8
/// let now = Utc.with_ymd_and_hms(2024, 6, 3, 2, 0, 0).unwrap();
///
/// let open = evaluate_slot_window(now, &slots, &ScheduleRules::default()).unwrap();
/// assert_eq!(open.len(), 1);
/// assert_eq!(open[0].period, "3 - 5");
/// ```
pub fn evaluate_slot_window(
    now: DateTime<Utc>,
    slots: &[DeliverySlot],
    rules: &ScheduleRules,
) -> CoreResult<Vec<DeliverySlot>> {
    let mut open = Vec::with_capacity(slots.len());
    for slot in slots {
        if is_slot_open(now, slot, rules)? {
            open.push(slot.clone());
        }
    }
    Ok(open)
}

/// Returns the timings strictly after the current local time (no buffer).
///
/// Used to list a store's remaining delivery timings for today.
pub fn upcoming_timings(
    now: DateTime<Utc>,
    timings: &[NaiveTime],
    rules: &ScheduleRules,
) -> CoreResult<Vec<NaiveTime>> {
    let current = rules.local_time(now)?.time();
    Ok(timings.iter().copied().filter(|t| *t > current).collect())
}

// =============================================================================
// Daily Gates
// =============================================================================

/// True once local time is strictly after the closing time.
///
/// Independent of the slot checks: a closed store takes no orders even if
/// a slot would otherwise be open.
pub fn is_store_closed(now: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<bool> {
    Ok(rules.local_time(now)?.time() > rules.closing_time)
}

/// True when the local month/day is inside the fasting window (inclusive).
///
/// Year-agnostic. A window whose start falls after its end (e.g. 20 Dec to
/// 10 Jan) wraps over the new year.
pub fn is_fasting_period(now: DateTime<Utc>, rules: &ScheduleRules) -> CoreResult<bool> {
    let local = rules.local_time(now)?;
    let today = MonthDay::new(local.month(), local.day());
    let (start, end) = (rules.fasting_start, rules.fasting_end);

    Ok(if start <= end {
        start <= today && today <= end
    } else {
        today >= start || today <= end
    })
}

/// True if today's local weekday is one of the store's operating days.
pub fn is_operating_today(
    days: &[Weekday],
    now: DateTime<Utc>,
    rules: &ScheduleRules,
) -> CoreResult<bool> {
    let today = rules.local_time(now)?.weekday();
    Ok(days.contains(&today))
}

// =============================================================================
// Calendar Ranges
// =============================================================================

/// True if `ts` falls in the same local week as `now`. Weeks start on Monday.
pub fn is_within_week(
    ts: DateTime<Utc>,
    now: DateTime<Utc>,
    rules: &ScheduleRules,
) -> CoreResult<bool> {
    let today = rules.local_time(now)?.date_naive();
    let date = rules.local_time(ts)?.date_naive();

    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(6);

    Ok(week_start <= date && date <= week_end)
}

/// True if `ts` falls in the same local calendar month as `now`.
pub fn is_within_month(
    ts: DateTime<Utc>,
    now: DateTime<Utc>,
    rules: &ScheduleRules,
) -> CoreResult<bool> {
    let today = rules.local_time(now)?;
    let date = rules.local_time(ts)?;
    Ok(today.year() == date.year() && today.month() == date.month())
}

// =============================================================================
// Slot Labels
// =============================================================================

/// Parses a customer-facing slot label into a time-of-day.
///
/// Accepts `"11:30 AM"`, `"5:00  PM"` (extra spaces) and `"10 AM"`.
pub fn parse_slot_label(label: &str) -> ValidationResult<NaiveTime> {
    let normalized = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    let invalid = || ValidationError::InvalidFormat {
        field: "slot label".to_string(),
        reason: format!("expected e.g. '10 AM' or '11:30 AM', got '{}'", label),
    };

    if let Ok(time) = NaiveTime::parse_from_str(&normalized, "%I:%M %p") {
        return Ok(time);
    }

    // chrono cannot build a time without minutes, so "10 AM" is split by hand
    let (hour, period) = normalized.split_once(' ').ok_or_else(invalid)?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }
    let hour = match period {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return Err(invalid()),
    };

    NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(invalid)
}

/// Returns when the market pickup run for a slot should be scheduled:
/// 45 minutes before the slot.
///
/// ## Example
/// ```rust
/// use chrono::NaiveTime;
/// use foodrun_core::schedule::milk_run_schedule_time;
///
/// let time = milk_run_schedule_time("10 AM").unwrap();
/// assert_eq!(time, NaiveTime::from_hms_opt(9, 15, 0).unwrap());
/// ```
pub fn milk_run_schedule_time(label: &str) -> ValidationResult<NaiveTime> {
    let slot = parse_slot_label(label)?;
    Ok(slot - Duration::minutes(MILK_RUN_LEAD_MINUTES))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rules() -> ScheduleRules {
        ScheduleRules::default()
    }

    /// Builds a UTC instant from a UTC+8 wall-clock reading.
    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        chrono::FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn slot(h: u32, m: u32, period: &str) -> DeliverySlot {
        DeliverySlot::new(NaiveTime::from_hms_opt(h, m, 0).unwrap(), period)
    }

    fn catalog() -> Vec<DeliverySlot> {
        vec![
            slot(11, 30, "12:30 - 2:30"),
            slot(14, 0, "3 - 5"),
            slot(17, 0, "6 - 8"),
        ]
    }

    #[test]
    fn test_buffer_excludes_slot_inside_lead_time() {
        let now = local(2024, 6, 3, 10, 0);
        assert!(!is_slot_open(now, &slot(11, 5, "x"), &rules()).unwrap());
        assert!(is_slot_open(now, &slot(11, 11, "x"), &rules()).unwrap());
    }

    #[test]
    fn test_buffer_boundary_is_exclusive() {
        // 10:00 + 70 min = 11:10 exactly; "strictly before" fails
        let now = local(2024, 6, 3, 10, 0);
        assert!(!is_slot_open(now, &slot(11, 10, "x"), &rules()).unwrap());
    }

    #[test]
    fn test_evaluate_keeps_catalog_order() {
        let open = evaluate_slot_window(local(2024, 6, 3, 8, 0), &catalog(), &rules()).unwrap();
        let periods: Vec<_> = open.iter().map(|s| s.period.as_str()).collect();
        assert_eq!(periods, vec!["12:30 - 2:30", "3 - 5", "6 - 8"]);

        let open = evaluate_slot_window(local(2024, 6, 3, 12, 0), &catalog(), &rules()).unwrap();
        let periods: Vec<_> = open.iter().map(|s| s.period.as_str()).collect();
        assert_eq!(periods, vec!["3 - 5", "6 - 8"]);

        let open = evaluate_slot_window(local(2024, 6, 3, 16, 0), &catalog(), &rules()).unwrap();
        assert!(open.is_empty());
    }

    #[test]
    fn test_evaluate_is_monotonic_within_a_day() {
        let slots = catalog();
        let mut previous = usize::MAX;
        for minute in (0..24 * 60).step_by(5) {
            let now = local(2024, 6, 3, minute / 60, minute % 60);
            let open = evaluate_slot_window(now, &slots, &rules()).unwrap();
            assert!(open.len() <= previous, "slot reappeared at minute {}", minute);
            previous = open.len();
        }
    }

    #[test]
    fn test_late_night_does_not_wrap_to_morning_slots() {
        let now = local(2024, 6, 3, 23, 50);
        let early = slot(0, 10, "midnight snack");
        assert!(!is_slot_open(now, &early, &rules()).unwrap());
    }

    #[test]
    fn test_configurable_buffer() {
        let rules = ScheduleRules {
            lead_buffer_minutes: 0,
            ..ScheduleRules::default()
        };
        assert!(is_slot_open(local(2024, 6, 3, 11, 4), &slot(11, 5, "x"), &rules).unwrap());
    }

    #[test]
    fn test_unrepresentable_buffer_is_an_error() {
        let rules = ScheduleRules {
            lead_buffer_minutes: i64::MAX,
            ..ScheduleRules::default()
        };
        let now = local(2024, 6, 3, 10, 0);
        assert!(is_slot_open(now, &slot(11, 30, "x"), &rules).is_err());
        assert!(evaluate_slot_window(now, &[slot(11, 30, "x")], &rules)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_store_closed() {
        assert!(is_store_closed(local(2024, 6, 3, 19, 46), &rules()).unwrap());
        assert!(!is_store_closed(local(2024, 6, 3, 19, 44), &rules()).unwrap());
        assert!(!is_store_closed(local(2024, 6, 3, 19, 45), &rules()).unwrap());
        assert!(is_store_closed(local(2024, 6, 3, 23, 59), &rules()).unwrap());
    }

    #[test]
    fn test_store_closed_uses_configured_offset() {
        // 11:46 UTC is 19:46 in UTC+8 but only 11:46 in UTC
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 11, 46, 0).unwrap();
        assert!(is_store_closed(now, &rules()).unwrap());

        let utc_rules = ScheduleRules {
            utc_offset_minutes: 0,
            ..ScheduleRules::default()
        };
        assert!(!is_store_closed(now, &utc_rules).unwrap());
    }

    #[test]
    fn test_fasting_period() {
        assert!(is_fasting_period(local(2024, 4, 20, 12, 0), &rules()).unwrap());
        assert!(!is_fasting_period(local(2024, 6, 1, 12, 0), &rules()).unwrap());
        assert!(is_fasting_period(local(2024, 4, 12, 0, 0), &rules()).unwrap());
        assert!(is_fasting_period(local(2024, 5, 12, 23, 59), &rules()).unwrap());
        assert!(!is_fasting_period(local(2024, 4, 11, 23, 59), &rules()).unwrap());
        assert!(!is_fasting_period(local(2024, 5, 13, 0, 0), &rules()).unwrap());
        // year-agnostic
        assert!(is_fasting_period(local(2031, 4, 30, 9, 0), &rules()).unwrap());
    }

    #[test]
    fn test_fasting_period_wrapping_new_year() {
        let rules = ScheduleRules {
            fasting_start: MonthDay::new(12, 20),
            fasting_end: MonthDay::new(1, 10),
            ..ScheduleRules::default()
        };
        assert!(is_fasting_period(local(2024, 12, 25, 9, 0), &rules).unwrap());
        assert!(is_fasting_period(local(2025, 1, 5, 9, 0), &rules).unwrap());
        assert!(!is_fasting_period(local(2025, 2, 1, 9, 0), &rules).unwrap());
    }

    #[test]
    fn test_upcoming_timings() {
        let timings = [
            NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        ];
        let upcoming = upcoming_timings(local(2024, 6, 3, 12, 0), &timings, &rules()).unwrap();
        assert_eq!(upcoming, vec![NaiveTime::from_hms_opt(14, 0, 0).unwrap()]);
    }

    #[test]
    fn test_is_operating_today() {
        // 3 June 2024 is a Monday
        let now = local(2024, 6, 3, 9, 0);
        assert!(is_operating_today(&[Weekday::Mon, Weekday::Tue], now, &rules()).unwrap());
        assert!(!is_operating_today(&[Weekday::Sat], now, &rules()).unwrap());
        assert!(!is_operating_today(&[], now, &rules()).unwrap());
    }

    #[test]
    fn test_is_within_week_starts_monday() {
        // Wednesday 5 June 2024; week is Mon 3 - Sun 9
        let now = local(2024, 6, 5, 12, 0);
        assert!(is_within_week(local(2024, 6, 3, 0, 0), now, &rules()).unwrap());
        assert!(is_within_week(local(2024, 6, 9, 23, 59), now, &rules()).unwrap());
        assert!(!is_within_week(local(2024, 6, 2, 23, 59), now, &rules()).unwrap());
        assert!(!is_within_week(local(2024, 6, 10, 0, 0), now, &rules()).unwrap());
    }

    #[test]
    fn test_is_within_month() {
        let now = local(2024, 6, 15, 12, 0);
        assert!(is_within_month(local(2024, 6, 1, 0, 0), now, &rules()).unwrap());
        assert!(!is_within_month(local(2024, 5, 31, 23, 59), now, &rules()).unwrap());
        assert!(!is_within_month(local(2023, 6, 15, 12, 0), now, &rules()).unwrap());
    }

    #[test]
    fn test_parse_slot_label() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(parse_slot_label("11:30 AM").unwrap(), t(11, 30));
        assert_eq!(parse_slot_label("2:00 PM").unwrap(), t(14, 0));
        assert_eq!(parse_slot_label("5:00  PM").unwrap(), t(17, 0));
        assert_eq!(parse_slot_label("10 am").unwrap(), t(10, 0));
        assert_eq!(parse_slot_label("12 PM").unwrap(), t(12, 0));
        assert_eq!(parse_slot_label("12 AM").unwrap(), t(0, 0));
        assert!(parse_slot_label("13 PM").is_err());
        assert!(parse_slot_label("noon").is_err());
        assert!(parse_slot_label("").is_err());
    }

    #[test]
    fn test_milk_run_schedule_time() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(milk_run_schedule_time("10 AM").unwrap(), t(9, 15));
        assert_eq!(milk_run_schedule_time("2:00 PM").unwrap(), t(13, 15));
    }
}
