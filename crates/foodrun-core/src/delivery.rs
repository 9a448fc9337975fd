//! # Delivery Cost Module
//!
//! Maps the distance between a market and a delivery address onto a fee.
//!
//! ## Tiering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  market ──haversine──► distance (km)                                    │
//! │                             │                                           │
//! │              ┌──────────────┴──────────────┐                            │
//! │              ▼                             ▼                            │
//! │       distance ≤ 8 km               distance > 8 km                     │
//! │       Low  → $6.00                  High → $9.00                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::geo::haversine_km;
use crate::money::Money;
use crate::rules::DeliveryRules;
use crate::types::{Coordinate, DeliveryCostTier};

/// Distance, tier and fee for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    pub distance_km: f64,
    pub tier: DeliveryCostTier,
    pub fee: Money,
}

/// Returns the cost tier for delivering from `origin` to `destination`.
///
/// ## Example
/// ```rust
/// use foodrun_core::delivery::compute_delivery_cost;
/// use foodrun_core::rules::DeliveryRules;
/// use foodrun_core::types::{Coordinate, DeliveryCostTier};
///
/// let market = Coordinate::new(1.2840, 103.8514).unwrap();
/// let nearby = Coordinate::new(1.3000, 103.8500).unwrap();
///
/// let tier = compute_delivery_cost(&market, &nearby, &DeliveryRules::default()).unwrap();
/// assert_eq!(tier, DeliveryCostTier::Low);
/// ```
pub fn compute_delivery_cost(
    origin: &Coordinate,
    destination: &Coordinate,
    rules: &DeliveryRules,
) -> CoreResult<DeliveryCostTier> {
    Ok(quote_delivery(origin, destination, rules)?.tier)
}

/// Computes the full delivery quote.
pub fn quote_delivery(
    origin: &Coordinate,
    destination: &Coordinate,
    rules: &DeliveryRules,
) -> CoreResult<DeliveryQuote> {
    let distance_km = haversine_km(origin, destination)?;
    let tier = DeliveryCostTier::for_distance(distance_km, rules.threshold_km);

    Ok(DeliveryQuote {
        distance_km,
        tier,
        fee: tier.fee(rules),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
