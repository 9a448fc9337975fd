//! # foodrun-core: Pure Ordering Rules for FoodRun
//!
//! This crate holds the business rules of the FoodRun food-ordering app
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FoodRun Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Market ──► Store Menu ──► Cart ──► Delivery ──► Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               foodrun-engine                                    │   │
//! │  │    config file + env, wall clock, logging                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ foodrun-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ schedule  │  │ delivery  │  │   order   │  │   cart    │  │   │
//! │  │   │  slots    │  │ haversine │  │  minimum  │  │ immutable │  │   │
//! │  │   │  closing  │  │  tiers    │  │  per store│  │  ops      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK READS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (DeliverySlot, Coordinate, CartItem, ...)
//! - [`rules`] - Configurable thresholds (buffer, closing time, fees, minimum)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`schedule`] - Slot window, closing gate, fasting period
//! - [`geo`] / [`delivery`] - Distance and delivery cost tiers
//! - [`order`] - Per-store minimum purchase validation
//! - [`cart`] - Immutable cart transformations
//! - [`calendar`] / [`invoice`] - Date formatting and invoice numbers
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `now` is always a parameter, never read here
//! 2. **Explicit Timezone**: the UTC offset comes from [`rules::ScheduleRules`]
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: malformed input is rejected, never turned into NaN
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use foodrun_core::rules::ScheduleRules;
//! use foodrun_core::schedule::{is_fasting_period, is_store_closed};
//!
//! let rules = ScheduleRules::default(); // UTC+8, closes 19:45
//! let now = Utc.with_ymd_and_hms(2024, 4, 20, 11, 46, 0).unwrap(); // 19:46 local
//!
//! assert!(is_store_closed(now, &rules).unwrap());
//! assert!(is_fasting_period(now, &rules).unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod cart;
pub mod delivery;
pub mod error;
pub mod geo;
pub mod invoice;
pub mod money;
pub mod order;
pub mod rules;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use delivery::{compute_delivery_cost, quote_delivery, DeliveryQuote};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{check_minimum_order, validate_minimum_order, MinimumOrderReport};
pub use rules::{DeliveryRules, OrderRules, ScheduleRules};
pub use schedule::{evaluate_slot_window, is_fasting_period, is_store_closed};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price of a menu item ($10,000.00).
///
/// With [`MAX_ITEM_QUANTITY`] and [`MAX_CART_ITEMS`] this keeps any cart
/// total far inside `i64` cents.
pub const MAX_ITEM_PRICE_CENTS: i64 = 1_000_000;

/// Singapore time (UTC+8).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 8 * 60;

/// Lead time between checkout and a slot's cutoff. Covers customers who
/// linger on the checkout page.
pub const DEFAULT_LEAD_BUFFER_MINUTES: i64 = 70;

pub const DEFAULT_CLOSING_HOUR: u32 = 19;
pub const DEFAULT_CLOSING_MINUTE: u32 = 45;

pub const DEFAULT_DELIVERY_THRESHOLD_KM: f64 = 8.0;
pub const DEFAULT_LOW_FEE_CENTS: i64 = 600;
pub const DEFAULT_HIGH_FEE_CENTS: i64 = 900;

/// Minimum subtotal per store ($4.00).
pub const DEFAULT_MINIMUM_ORDER_CENTS: i64 = 400;
