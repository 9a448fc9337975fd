//! # Order Engine
//!
//! Binds an [`EngineConfig`] to a [`Clock`] and answers the questions the
//! checkout flow asks, logging each decision.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          OrderEngine                                    │
//! │                                                                         │
//! │   clock.now() ──┬──► availability()  ── closed? fasting? open slots     │
//! │                 └──► invoice_number()                                   │
//! │                                                                         │
//! │   coordinates  ─────► quote_delivery()  ── distance, tier, fee          │
//! │   cart + order ─────► check_order()     ── per-store subtotals          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use foodrun_core::geo::{select_delivery_location, DeliveryLocation, GeocodeResult};
use foodrun_core::{
    evaluate_slot_window, invoice, order, schedule, CartItem, Coordinate, DeliveryQuote,
    DeliverySlot, MinimumOrderReport, OrderGrouping,
};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineResult;

// =============================================================================
// Availability Snapshot
// =============================================================================

/// What the checkout page needs to know about ordering right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    /// When the snapshot was taken.
    pub evaluated_at: DateTime<Utc>,
    /// Local time is past the closing time.
    pub closed: bool,
    /// Local date falls in the fasting window.
    pub fasting_period: bool,
    /// Slots whose cutoff is still ahead of now plus the lead buffer.
    pub open_slots: Vec<DeliverySlot>,
}

impl SlotAvailability {
    /// True if an order can be placed for at least one slot.
    pub fn accepts_orders(&self) -> bool {
        !self.closed && !self.open_slots.is_empty()
    }
}

// =============================================================================
// Engine
// =============================================================================

pub struct OrderEngine<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
}

impl OrderEngine<SystemClock> {
    /// Creates an engine on the system clock.
    pub fn with_system_clock(config: EngineConfig) -> EngineResult<Self> {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> OrderEngine<C> {
    /// Creates an engine after validating the configuration.
    pub fn new(config: EngineConfig, clock: C) -> EngineResult<Self> {
        config.validate()?;
        info!(
            slots = config.slots.len(),
            utc_offset_minutes = config.schedule.utc_offset_minutes,
            lead_buffer_minutes = config.schedule.lead_buffer_minutes,
            "Order engine ready"
        );
        Ok(OrderEngine { config, clock })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Schedule
    // =========================================================================

    /// Slots still orderable at the current instant.
    pub fn open_slots(&self) -> EngineResult<Vec<DeliverySlot>> {
        let now = self.now();
        let open = evaluate_slot_window(now, &self.config.slots, &self.config.schedule)?;
        debug!(%now, open = open.len(), total = self.config.slots.len(), "Evaluated slot window");
        Ok(open)
    }

    pub fn is_closed(&self) -> EngineResult<bool> {
        Ok(schedule::is_store_closed(self.now(), &self.config.schedule)?)
    }

    pub fn is_fasting_period(&self) -> EngineResult<bool> {
        Ok(schedule::is_fasting_period(self.now(), &self.config.schedule)?)
    }

    /// Evaluates the closing gate, fasting window and slot window against
    /// a single clock reading.
    pub fn availability(&self) -> EngineResult<SlotAvailability> {
        let now = self.now();
        let rules = &self.config.schedule;

        let availability = SlotAvailability {
            evaluated_at: now,
            closed: schedule::is_store_closed(now, rules)?,
            fasting_period: schedule::is_fasting_period(now, rules)?,
            open_slots: evaluate_slot_window(now, &self.config.slots, rules)?,
        };

        if availability.closed {
            info!(%now, "Store closed for the day");
        }
        debug!(
            %now,
            closed = availability.closed,
            fasting_period = availability.fasting_period,
            open = availability.open_slots.len(),
            "Computed availability"
        );
        Ok(availability)
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    pub fn quote_delivery(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> EngineResult<DeliveryQuote> {
        let quote = foodrun_core::quote_delivery(origin, destination, &self.config.delivery)?;
        debug!(
            distance_km = quote.distance_km,
            tier = ?quote.tier,
            fee = %quote.fee,
            "Quoted delivery"
        );
        Ok(quote)
    }

    /// Picks the customer's address from geocoder hits and quotes delivery
    /// to it from `market`.
    pub fn quote_for_address(
        &self,
        market: &Coordinate,
        results: &[GeocodeResult],
        address: &str,
    ) -> EngineResult<(DeliveryLocation, DeliveryQuote)> {
        let location = select_delivery_location(results, address).map_err(|e| {
            warn!(%address, hits = results.len(), error = %e, "No usable geocoder hit");
            e
        })?;
        let quote = self.quote_delivery(market, &location.coordinate)?;
        Ok((location, quote))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Per-store subtotals and shortfalls against the configured minimum.
    pub fn check_order(
        &self,
        cart: &[CartItem],
        grouping: &OrderGrouping,
    ) -> EngineResult<MinimumOrderReport> {
        let report = order::check_minimum_order(cart, grouping, &self.config.order)?;
        for shortfall in &report.shortfalls {
            info!(
                store_id = %shortfall.store_id,
                subtotal = %shortfall.subtotal,
                shortfall = %shortfall.shortfall,
                "Store below minimum order"
            );
        }
        Ok(report)
    }

    pub fn validate_order(&self, cart: &[CartItem], grouping: &OrderGrouping) -> EngineResult<bool> {
        Ok(self.check_order(cart, grouping)?.is_valid())
    }

    pub fn invoice_number(&self, market_id: &str, phone_number: &str) -> EngineResult<String> {
        Ok(invoice::invoice_number(
            market_id,
            phone_number,
            self.now(),
            &self.config.schedule,
        )?)
    }
}
