//! # Business Rules
//!
//! The configurable thresholds every computation in this crate reads.
//!
//! ## Where the numbers come from
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule                     Default          Used by                      │
//! │  ───────────────────────  ───────────────  ──────────────────────────   │
//! │  UTC offset               +08:00           every time computation       │
//! │  Lead buffer              70 min           evaluate_slot_window         │
//! │  Closing time             19:45            is_store_closed              │
//! │  Fasting window           12 Apr - 12 May  is_fasting_period            │
//! │  Distance threshold       8 km             compute_delivery_cost        │
//! │  Fees                     $6 / $9          DeliveryCostTier::fee        │
//! │  Minimum per store        $4.00            validate_minimum_order       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The structs deserialize with per-field defaults so a config file only
//! needs to name what it changes. Loading files is the engine's job; this
//! module only describes and validates the values.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{hh_mm, MonthDay};
use crate::validation::ValidationResult;
use crate::{
    DEFAULT_CLOSING_HOUR, DEFAULT_CLOSING_MINUTE, DEFAULT_DELIVERY_THRESHOLD_KM,
    DEFAULT_HIGH_FEE_CENTS, DEFAULT_LEAD_BUFFER_MINUTES, DEFAULT_LOW_FEE_CENTS,
    DEFAULT_MINIMUM_ORDER_CENTS, DEFAULT_UTC_OFFSET_MINUTES,
};

/// Largest offset chrono accepts, exclusive (24 hours).
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

// =============================================================================
// Schedule Rules
// =============================================================================

/// Time-of-day and calendar rules.
///
/// ## Timezone
/// There is no process-wide default timezone. Every time-dependent function
/// takes `now` in UTC plus these rules and converts with
/// [`ScheduleRules::local_time`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRules {
    /// Local offset from UTC in minutes (480 = UTC+8).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Minimum minutes between placing an order and a slot's cutoff.
    #[serde(default = "default_lead_buffer_minutes")]
    pub lead_buffer_minutes: i64,

    /// Orders are closed once local time passes this.
    #[serde(default = "default_closing_time", with = "hh_mm")]
    pub closing_time: NaiveTime,

    /// First day of the fasting period (inclusive).
    #[serde(default = "default_fasting_start")]
    pub fasting_start: MonthDay,

    /// Last day of the fasting period (inclusive).
    #[serde(default = "default_fasting_end")]
    pub fasting_end: MonthDay,
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

fn default_lead_buffer_minutes() -> i64 {
    DEFAULT_LEAD_BUFFER_MINUTES
}

fn default_closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_CLOSING_HOUR, DEFAULT_CLOSING_MINUTE, 0)
        .unwrap_or(NaiveTime::MIN)
}

fn default_fasting_start() -> MonthDay {
    MonthDay::new(4, 12)
}

fn default_fasting_end() -> MonthDay {
    MonthDay::new(5, 12)
}

impl Default for ScheduleRules {
    fn default() -> Self {
        ScheduleRules {
            utc_offset_minutes: default_utc_offset_minutes(),
            lead_buffer_minutes: default_lead_buffer_minutes(),
            closing_time: default_closing_time(),
            fasting_start: default_fasting_start(),
            fasting_end: default_fasting_end(),
        }
    }
}

impl ScheduleRules {
    /// Returns the configured timezone.
    pub fn timezone(&self) -> CoreResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "utc_offset_minutes".to_string(),
                min: -(MAX_OFFSET_MINUTES as i64) + 1,
                max: MAX_OFFSET_MINUTES as i64 - 1,
            }
            .into()
        })
    }

    /// Converts an instant into local time.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Timelike, Utc};
    /// use foodrun_core::rules::ScheduleRules;
    ///
    /// let rules = ScheduleRules::default(); // UTC+8
    /// let now = Utc.with_ymd_and_hms(2024, 4, 20, 2, 0, 0).unwrap();
    /// assert_eq!(rules.local_time(now).unwrap().hour(), 10);
    /// ```
    pub fn local_time(&self, now: DateTime<Utc>) -> CoreResult<DateTime<FixedOffset>> {
        Ok(now.with_timezone(&self.timezone()?))
    }

    /// Returns the lead buffer as a duration.
    pub fn lead_buffer(&self) -> CoreResult<Duration> {
        Duration::try_minutes(self.lead_buffer_minutes).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "lead_buffer_minutes".to_string(),
                min: 0,
                max: MAX_OFFSET_MINUTES as i64,
            }
            .into()
        })
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(ValidationError::OutOfRange {
                field: "utc_offset_minutes".to_string(),
                min: -(MAX_OFFSET_MINUTES as i64) + 1,
                max: MAX_OFFSET_MINUTES as i64 - 1,
            });
        }

        if self.lead_buffer_minutes < 0 || self.lead_buffer_minutes > MAX_OFFSET_MINUTES as i64 {
            return Err(ValidationError::OutOfRange {
                field: "lead_buffer_minutes".to_string(),
                min: 0,
                max: MAX_OFFSET_MINUTES as i64,
            });
        }

        for (field, day) in [
            ("fasting_start", self.fasting_start),
            ("fasting_end", self.fasting_end),
        ] {
            if !day.is_valid() {
                return Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: format!("{}/{} is not a calendar day", day.day, day.month),
                });
            }
        }

        Ok(())
    }
}

// =============================================================================
// Delivery Rules
// =============================================================================

/// Distance threshold and the fee charged on either side of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRules {
    /// Distances strictly above this are charged the high fee.
    #[serde(default = "default_threshold_km")]
    pub threshold_km: f64,

    #[serde(default = "default_low_fee", rename = "low_fee_cents")]
    pub low_fee: Money,

    #[serde(default = "default_high_fee", rename = "high_fee_cents")]
    pub high_fee: Money,
}

fn default_threshold_km() -> f64 {
    DEFAULT_DELIVERY_THRESHOLD_KM
}

fn default_low_fee() -> Money {
    Money::from_cents(DEFAULT_LOW_FEE_CENTS)
}

fn default_high_fee() -> Money {
    Money::from_cents(DEFAULT_HIGH_FEE_CENTS)
}

impl Default for DeliveryRules {
    fn default() -> Self {
        DeliveryRules {
            threshold_km: default_threshold_km(),
            low_fee: default_low_fee(),
            high_fee: default_high_fee(),
        }
    }
}

impl DeliveryRules {
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.threshold_km.is_finite() || self.threshold_km <= 0.0 {
            return Err(ValidationError::MustBePositive {
                field: "threshold_km".to_string(),
            });
        }

        if self.low_fee.is_negative() || self.high_fee.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "delivery fee".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        if self.low_fee > self.high_fee {
            return Err(ValidationError::InvalidFormat {
                field: "delivery fee".to_string(),
                reason: format!(
                    "low fee {} is more than high fee {}",
                    self.low_fee, self.high_fee
                ),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Order Rules
// =============================================================================

/// Per-store purchase requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRules {
    /// Every store in an order must reach this subtotal (inclusive).
    #[serde(default = "default_minimum_per_store", rename = "minimum_per_store_cents")]
    pub minimum_per_store: Money,
}

fn default_minimum_per_store() -> Money {
    Money::from_cents(DEFAULT_MINIMUM_ORDER_CENTS)
}

impl Default for OrderRules {
    fn default() -> Self {
        OrderRules {
            minimum_per_store: default_minimum_per_store(),
        }
    }
}

impl OrderRules {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.minimum_per_store.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "minimum_per_store".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
