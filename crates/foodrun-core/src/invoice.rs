//! # Invoice Numbers
//!
//! Short, human-friendly order references for customers and admins.
//!
//! ```text
//! market "TPY" + phone "9123 4567" + 20 April  →  "TPY91232004"
//!         │              │                 │
//!      market id    first 4 digits     DDMM (local)
//! ```
//!
//! Not globally unique: two orders from the same phone at the same market on
//! the same day share a number. The order document id stays the real key.

use chrono::{DateTime, Utc};

use crate::calendar::date_and_month;
use crate::error::CoreResult;
use crate::rules::ScheduleRules;
use crate::validation::{validate_market_id, validate_phone_number};

/// Builds the invoice number for an order placed at `now`.
pub fn invoice_number(
    market_id: &str,
    phone_number: &str,
    now: DateTime<Utc>,
    rules: &ScheduleRules,
) -> CoreResult<String> {
    validate_market_id(market_id)?;
    let digits = validate_phone_number(phone_number)?;

    let prefix: String = digits.chars().take(4).collect();
    Ok(format!(
        "{}{}{}",
        market_id.trim(),
        prefix,
        date_and_month(now, rules)?
    ))
}
