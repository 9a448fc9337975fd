//! # Order Validation Module
//!
//! Checks that every store in an order reaches the minimum purchase.
//!
//! ## How a subtotal is formed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart:   a  $2.00 × 2        order: store1 → [a, b]                     │
//! │          b  $0.50 × 1               store2 → [c]                        │
//! │          c  $1.50 × 2                                                   │
//! │                                                                         │
//! │  store1 = 2.00×2 + 0.50×1 = $4.50   ≥ $4.00  ✅                         │
//! │  store2 = 1.50×2          = $3.00   < $4.00  ❌ short by $1.00          │
//! │                                                                         │
//! │  validate_minimum_order → false                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - The minimum is inclusive: exactly $4.00 passes.
//! - An empty order has no store that can fail, so it is valid.
//! - A store whose ids match nothing in the cart has subtotal $0.00 and fails.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{overflow, Money};
use crate::rules::OrderRules;
use crate::types::{CartItem, OrderGrouping};
use crate::validation::{
    validate_item_id, validate_price, validate_quantity, validate_store_id, ValidationResult,
};

// =============================================================================
// Report Types
// =============================================================================

/// A store that did not reach the minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreShortfall {
    pub store_id: String,
    pub subtotal: Money,
    /// How much more the customer must add from this store.
    pub shortfall: Money,
}

/// Result of checking an order against the per-store minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MinimumOrderReport {
    pub minimum: Money,
    pub subtotals: BTreeMap<String, Money>,
    /// Failing stores in store id order.
    pub shortfalls: Vec<StoreShortfall>,
}

impl MinimumOrderReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

// =============================================================================
// Input Checks
// =============================================================================

/// Rejects carts the validator cannot reason about.
///
/// ## Rules
/// - Item ids are non-empty and unique
/// - Quantities are within 1..=999
/// - Prices are not negative
pub fn validate_cart_snapshot(cart: &[CartItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(cart.len());
    for item in cart {
        validate_item_id(&item.id)?;
        validate_quantity(item.quantity)?;
        validate_price(item.price)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "cart item id".to_string(),
                value: item.id.clone(),
            });
        }
    }
    Ok(())
}

fn validate_grouping(order: &OrderGrouping) -> ValidationResult<()> {
    for (store_id, item_ids) in order {
        validate_store_id(store_id)?;
        for item_id in item_ids {
            validate_item_id(item_id)?;
        }
    }
    Ok(())
}

// =============================================================================
// Subtotals
// =============================================================================

/// Computes each store's subtotal: price × quantity over the cart items
/// whose id the store lists.
///
/// An id listed twice for the same store still counts its cart item once.
/// A subtotal that would leave the `i64` range fails with `OutOfRange`.
pub fn store_subtotals(
    cart: &[CartItem],
    order: &OrderGrouping,
) -> CoreResult<BTreeMap<String, Money>> {
    validate_cart_snapshot(cart)?;
    validate_grouping(order)?;

    let mut subtotals = BTreeMap::new();
    for (store_id, item_ids) in order {
        let wanted: HashSet<&str> = item_ids.iter().map(String::as_str).collect();

        let mut subtotal = Money::zero();
        for item in cart.iter().filter(|item| wanted.contains(item.id.as_str())) {
            subtotal = subtotal
                .checked_add(item.line_total()?)
                .ok_or_else(|| overflow("store subtotal"))?;
        }
        subtotals.insert(store_id.clone(), subtotal);
    }

    Ok(subtotals)
}

/// Checks every store against the minimum and reports the shortfalls.
pub fn check_minimum_order(
    cart: &[CartItem],
    order: &OrderGrouping,
    rules: &OrderRules,
) -> CoreResult<MinimumOrderReport> {
    let minimum = rules.minimum_per_store;
    let subtotals = store_subtotals(cart, order)?;

    let shortfalls = subtotals
        .iter()
        .filter(|(_, subtotal)| **subtotal < minimum)
        .map(|(store_id, subtotal)| StoreShortfall {
            store_id: store_id.clone(),
            subtotal: *subtotal,
            shortfall: minimum - *subtotal,
        })
        .collect();

    Ok(MinimumOrderReport {
        minimum,
        subtotals,
        shortfalls,
    })
}

/// True only if every store's subtotal is at least the minimum.
///
/// ## Example
/// ```rust
/// use foodrun_core::money::Money;
/// use foodrun_core::order::validate_minimum_order;
/// use foodrun_core::rules::OrderRules;
/// use foodrun_core::types::{CartItem, OrderGrouping};
///
/// let cart = vec![CartItem::new("a", "Kopi", Money::from_cents(200), 2)];
/// let mut order = OrderGrouping::new();
/// order.insert("store1".to_string(), vec!["a".to_string()]);
///
/// assert!(validate_minimum_order(&cart, &order, &OrderRules::default()).unwrap());
/// ```
pub fn validate_minimum_order(
    cart: &[CartItem],
    order: &OrderGrouping,
    rules: &OrderRules,
) -> CoreResult<bool> {
    Ok(check_minimum_order(cart, order, rules)?.is_valid())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_ITEM_PRICE_CENTS, MAX_ITEM_QUANTITY};

    fn item(id: &str, cents: i64, qty: i64) -> CartItem {
        CartItem::new(id, id, Money::from_cents(cents), qty)
    }

    fn grouping(entries: &[(&str, &[&str])]) -> OrderGrouping {
        entries
            .iter()
            .map(|(store, ids)| {
                (
                    store.to_string(),
                    ids.iter().map(|id| id.to_string()).collect(),
                )
            })
            .collect()
    }

    fn rules() -> OrderRules {
        OrderRules::default()
    }

    #[test]
    fn test_exactly_minimum_is_valid() {
        let cart = vec![item("a", 200, 2)];
        let order = grouping(&[("store1", &["a"])]);
        assert!(validate_minimum_order(&cart, &order, &rules()).unwrap());
    }

    #[test]
    fn test_below_minimum_is_invalid() {
        let cart = vec![item("a", 150, 2)];
        let order = grouping(&[("store1", &["a"])]);
        assert!(!validate_minimum_order(&cart, &order, &rules()).unwrap());
    }

    #[test]
    fn test_empty_order_is_valid() {
        let cart = vec![item("a", 150, 2)];
        assert!(validate_minimum_order(&cart, &OrderGrouping::new(), &rules()).unwrap());
        assert!(validate_minimum_order(&[], &OrderGrouping::new(), &rules()).unwrap());
    }

    #[test]
    fn test_store_without_matching_items_fails() {
        let cart = vec![item("a", 500, 1)];
        let order = grouping(&[("store1", &["a"]), ("store2", &["missing"])]);

        let report = check_minimum_order(&cart, &order, &rules()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.subtotals["store2"], Money::zero());
        assert_eq!(report.shortfalls.len(), 1);
        assert_eq!(report.shortfalls[0].store_id, "store2");
        assert_eq!(report.shortfalls[0].shortfall, Money::from_cents(400));
    }

    #[test]
    fn test_report_lists_every_failing_store() {
        let cart = vec![
            item("a", 200, 2),
            item("b", 50, 1),
            item("c", 150, 2),
            item("d", 100, 1),
        ];
        let order = grouping(&[("store1", &["a", "b"]), ("store2", &["c"]), ("store3", &["d"])]);

        let report = check_minimum_order(&cart, &order, &rules()).unwrap();
        assert_eq!(report.subtotals["store1"].cents(), 450);
        assert_eq!(report.subtotals["store2"].cents(), 300);
        let failing: Vec<_> = report.shortfalls.iter().map(|s| s.store_id.as_str()).collect();
        assert_eq!(failing, vec!["store2", "store3"]);
        assert_eq!(report.shortfalls[1].shortfall.cents(), 300);
    }

    #[test]
    fn test_duplicate_ids_in_store_list_count_once() {
        let cart = vec![item("a", 150, 2)];
        let order = grouping(&[("store1", &["a", "a"])]);
        let subtotals = store_subtotals(&cart, &order).unwrap();
        assert_eq!(subtotals["store1"].cents(), 300);
    }

    #[test]
    fn test_configurable_minimum() {
        let cart = vec![item("a", 150, 2)];
        let order = grouping(&[("store1", &["a"])]);
        let rules = OrderRules {
            minimum_per_store: Money::from_cents(300),
        };
        assert!(validate_minimum_order(&cart, &order, &rules).unwrap());
    }

    #[test]
    fn test_rejects_malformed_input() {
        let order = grouping(&[("store1", &["a"])]);

        let negative_qty = vec![item("a", 200, -1)];
        assert!(validate_minimum_order(&negative_qty, &order, &rules())
            .unwrap_err()
            .is_invalid_input());

        let negative_price = vec![item("a", -200, 3)];
        assert!(validate_minimum_order(&negative_price, &order, &rules()).is_err());

        let empty_id = vec![item("", 200, 2)];
        assert!(validate_minimum_order(&empty_id, &order, &rules()).is_err());

        let duplicate = vec![item("a", 200, 2), item("a", 100, 1)];
        assert!(validate_minimum_order(&duplicate, &order, &rules()).is_err());

        let cart = vec![item("a", 200, 2)];
        let empty_store = grouping(&[("", &["a"])]);
        assert!(validate_minimum_order(&cart, &empty_store, &rules()).is_err());

        let empty_item_ref = grouping(&[("store1", &[""])]);
        assert!(validate_minimum_order(&cart, &empty_item_ref, &rules()).is_err());
    }

    #[test]
    fn test_rejects_prices_that_would_overflow() {
        let order = grouping(&[("store1", &["a", "b"])]);

        let huge = vec![item("a", i64::MAX / 2, 3)];
        let err = validate_minimum_order(&huge, &order, &rules()).unwrap_err();
        assert!(err.is_invalid_input());

        let two_max = vec![item("a", i64::MAX, 1), item("b", i64::MAX, 1)];
        assert!(check_minimum_order(&two_max, &order, &rules())
            .unwrap_err()
            .is_invalid_input());

        // The largest accepted cart still sums exactly
        let top = vec![
            item("a", MAX_ITEM_PRICE_CENTS, MAX_ITEM_QUANTITY),
            item("b", MAX_ITEM_PRICE_CENTS, MAX_ITEM_QUANTITY),
        ];
        let report = check_minimum_order(&top, &order, &rules()).unwrap();
        assert_eq!(
            report.subtotals["store1"].cents(),
            2 * MAX_ITEM_PRICE_CENTS * MAX_ITEM_QUANTITY
        );
    }

    #[test]
    fn test_order_grouping_from_frontend_json() {
        let order: OrderGrouping =
            serde_json::from_str(r#"{"store1":["a","b"],"store2":["c"]}"#).unwrap();
        let cart: Vec<CartItem> = serde_json::from_str(
            r#"[{"id":"a","price":200,"qty":1},{"id":"b","price":200,"qty":1},{"id":"c","price":400,"qty":1}]"#,
        )
        .unwrap();
        assert!(validate_minimum_order(&cart, &order, &rules()).unwrap());
    }
}
