//! # Domain Types
//!
//! Core domain types used throughout FoodRun.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DeliverySlot   │   │   Coordinate    │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  order_by 11:30 │   │  latitude       │   │  id (menu doc)  │       │
//! │  │  period label   │   │  longitude      │   │  price (Money)  │       │
//! │  └─────────────────┘   └─────────────────┘   │  quantity >= 1  │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ DeliveryCostTier│   │  OrderGrouping  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Low  (≤ 8 km)  │   │  store id →     │                             │
//! │  │  High (> 8 km)  │   │   [item ids]    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are transient snapshots: they are rebuilt for every quote or
//! validation and never persisted by this crate.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{overflow, Money};
use crate::rules::DeliveryRules;
use crate::validation::{validate_latitude, validate_longitude, ValidationResult};

// =============================================================================
// Delivery Slot
// =============================================================================

/// A fixed daily delivery window with an order-by cutoff.
///
/// ## Example (JSON)
/// ```json
/// { "orderBy": "11:30", "period": "12:30 - 2:30" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySlot {
    /// Last time-of-day an order for this slot is accepted.
    #[serde(with = "hh_mm")]
    #[ts(as = "String")]
    pub order_by: NaiveTime,

    /// Opaque label shown to the customer, e.g. `"3 - 5"`.
    pub period: String,
}

impl DeliverySlot {
    /// Creates a slot from an `order_by` time-of-day and a period label.
    pub fn new(order_by: NaiveTime, period: impl Into<String>) -> Self {
        DeliverySlot {
            order_by,
            period: period.into(),
        }
    }
}

// =============================================================================
// Coordinate
// =============================================================================

/// A point in decimal degrees.
///
/// Used for both the market (origin) and the delivery address (destination).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// ## Example
    /// ```rust
    /// use foodrun_core::types::Coordinate;
    ///
    /// assert!(Coordinate::new(1.3521, 103.8198).is_ok());
    /// assert!(Coordinate::new(91.0, 103.8198).is_err());
    /// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> ValidationResult<Self> {
        let coordinate = Coordinate {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks the coordinate is finite and within range.
    ///
    /// Fields are public for deserialization, so every computation calls
    /// this before trusting the values.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_latitude(self.latitude)?;
        validate_longitude(self.longitude)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A menu item in the customer's cart.
///
/// ## Invariants (enforced by [`crate::cart::Cart`])
/// - `id` is unique within a cart and non-empty
/// - `quantity` is between 1 and [`crate::MAX_ITEM_QUANTITY`]
/// - `price` is never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Menu item document id.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Quantity ordered.
    #[serde(rename = "qty")]
    pub quantity: i64,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money, quantity: i64) -> Self {
        CartItem {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Calculates the line total (unit price × quantity).
    ///
    /// Fails with `OutOfRange` if the product leaves the `i64` range.
    #[inline]
    pub fn line_total(&self) -> ValidationResult<Money> {
        self.price
            .checked_mul(self.quantity)
            .ok_or_else(|| overflow("line total"))
    }
}

// =============================================================================
// Order Grouping
// =============================================================================

/// Store id → ids of the cart items ordered from that store.
///
/// A `BTreeMap` keeps iteration (and therefore any reported shortfalls)
/// in a stable order.
pub type OrderGrouping = BTreeMap<String, Vec<String>>;

// =============================================================================
// Delivery Cost Tier
// =============================================================================

/// Delivery fee bucket keyed by distance.
///
/// ## Invariant
/// `High` iff the distance strictly exceeds [`DeliveryRules::threshold_km`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryCostTier {
    /// Within the threshold ($6 by default).
    Low,
    /// Beyond the threshold ($9 by default).
    High,
}

impl DeliveryCostTier {
    /// Picks the tier for a distance. The threshold itself is `Low`.
    pub fn for_distance(distance_km: f64, threshold_km: f64) -> Self {
        if distance_km > threshold_km {
            DeliveryCostTier::High
        } else {
            DeliveryCostTier::Low
        }
    }

    /// Returns the configured fee for this tier.
    pub fn fee(&self, rules: &DeliveryRules) -> Money {
        match self {
            DeliveryCostTier::Low => rules.low_fee,
            DeliveryCostTier::High => rules.high_fee,
        }
    }
}

// =============================================================================
// Month/Day
// =============================================================================

/// A year-agnostic calendar day, e.g. 12 April.
///
/// Field order matters: the derived `Ord` compares month first, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        MonthDay { month, day }
    }

    /// Checks the day exists in some year (29 February is accepted).
    pub fn is_valid(&self) -> bool {
        NaiveDate::from_ymd_opt(2000, self.month, self.day).is_some()
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Serializes a `NaiveTime` as `"HH:MM"`; accepts `"HH:MM"` or `"HH:MM:SS"`.
pub(crate) mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| format!("expected HH:MM, got '{}'", raw))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
