//! # Cart Module
//!
//! The customer's cart as an immutable value.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transformations                                 │
//! │                                                                         │
//! │  Frontend Action          Operation                  Result             │
//! │  ───────────────          ─────────                  ──────             │
//! │                                                                         │
//! │  Add to cart ───────────► add_item(item) ──────────► new Cart          │
//! │  Tap "+" ───────────────► increment_quantity(id) ──► new Cart          │
//! │  Tap "−" ───────────────► decrement_quantity(id) ──► new Cart / Err    │
//! │  Remove ────────────────► remove_item(id) ─────────► new Cart          │
//! │  Checkout done ─────────► clear() ─────────────────► empty Cart        │
//! │                                                                         │
//! │  NOTE: every operation takes &self and returns a fresh Cart. The old   │
//! │        value is never touched, so the frontend can diff or undo.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `id` (adding an id already present merges quantity)
//! - Every quantity stays within 1..=999; reaching 0 is an error, not a
//!   silent removal
//! - At most 100 distinct items

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{overflow, Money};
use crate::order::validate_cart_snapshot;
use crate::types::CartItem;
use crate::validation::{validate_cart_size, validate_item_id, validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An immutable shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from a snapshot, checking every invariant.
    pub fn from_items(items: Vec<CartItem>) -> CoreResult<Self> {
        validate_cart_snapshot(&items)?;
        if items.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        Ok(Cart { items })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when there is at least one item to check out.
    #[inline]
    pub fn is_filled(&self) -> bool {
        !self.is_empty()
    }

    /// Sum of price × quantity over every item.
    pub fn total(&self) -> CoreResult<Money> {
        let mut total = Money::zero();
        for item in &self.items {
            total = total
                .checked_add(item.line_total()?)
                .ok_or_else(|| overflow("cart total"))?;
        }
        Ok(total)
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Returns a cart with `item` added.
    ///
    /// ## Behavior
    /// - If the id is already in the cart: quantities merge, the stored
    ///   price and name are kept
    /// - Otherwise the item is appended
    ///
    /// ## Example
    /// ```rust
    /// use foodrun_core::cart::Cart;
    /// use foodrun_core::money::Money;
    /// use foodrun_core::types::CartItem;
    ///
    /// let cart = Cart::new();
    /// let cart = cart.add_item(CartItem::new("a", "Teh Tarik", Money::from_cents(180), 1)).unwrap();
    /// let cart = cart.add_item(CartItem::new("a", "Teh Tarik", Money::from_cents(180), 2)).unwrap();
    /// assert_eq!(cart.len(), 1);
    /// assert_eq!(cart.get("a").unwrap().quantity, 3);
    /// ```
    pub fn add_item(&self, item: CartItem) -> CoreResult<Cart> {
        validate_item_id(&item.id)?;
        validate_quantity(item.quantity)?;
        validate_price(item.price)?;

        if let Some(existing) = self.get(&item.id) {
            let merged = existing.quantity + item.quantity;
            return self.set_quantity(&item.id, merged);
        }

        validate_cart_size(self.items.len())?;

        let mut items = self.items.clone();
        items.push(item);
        Ok(Cart { items })
    }

    /// Returns a cart with the item's quantity raised by one.
    pub fn increment_quantity(&self, item_id: &str) -> CoreResult<Cart> {
        let current = self.require(item_id)?.quantity;
        self.set_quantity(item_id, current + 1)
    }

    /// Returns a cart with the item's quantity lowered by one.
    ///
    /// ## Errors
    /// At quantity 1 this fails with `QuantityBelowMinimum`; the caller
    /// decides whether to call [`Cart::remove_item`].
    pub fn decrement_quantity(&self, item_id: &str) -> CoreResult<Cart> {
        let current = self.require(item_id)?.quantity;
        if current <= 1 {
            return Err(CoreError::QuantityBelowMinimum {
                item_id: item_id.to_string(),
            });
        }
        self.set_quantity(item_id, current - 1)
    }

    /// Returns a cart with the item's quantity replaced.
    pub fn update_quantity(&self, item_id: &str, quantity: i64) -> CoreResult<Cart> {
        self.require(item_id)?;
        if quantity < 1 {
            return Err(CoreError::QuantityBelowMinimum {
                item_id: item_id.to_string(),
            });
        }
        self.set_quantity(item_id, quantity)
    }

    /// Returns a cart without the item.
    pub fn remove_item(&self, item_id: &str) -> CoreResult<Cart> {
        self.require(item_id)?;
        let items = self
            .items
            .iter()
            .filter(|item| item.id != item_id)
            .cloned()
            .collect();
        Ok(Cart { items })
    }

    /// Returns an empty cart.
    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require(&self, item_id: &str) -> CoreResult<&CartItem> {
        self.get(item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))
    }

    fn set_quantity(&self, item_id: &str, quantity: i64) -> CoreResult<Cart> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == item_id {
                    CartItem {
                        quantity,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Ok(Cart { items })
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CoreError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_ITEM_PRICE_CENTS;

    fn item(id: &str, cents: i64, qty: i64) -> CartItem {
        CartItem::new(id, format!("Item {}", id), Money::from_cents(cents), qty)
    }

    fn cart_with(items: Vec<CartItem>) -> Cart {
        items
            .into_iter()
            .fold(Cart::new(), |cart, item| cart.add_item(item).unwrap())
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert!(!cart.is_filled());
        assert_eq!(cart.total().unwrap(), Money::zero());
    }

    #[test]
    fn test_add_item_leaves_original_untouched() {
        let empty = Cart::new();
        let one = empty.add_item(item("a", 200, 1)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(one.is_filled());
    }

    #[test]
    fn test_add_existing_item_merges_quantity() {
        let cart = cart_with(vec![item("a", 200, 1), item("b", 100, 1)]);
        let cart = cart.add_item(item("a", 999, 2)).unwrap();
        assert_eq!(cart.len(), 2);
        let a = cart.get("a").unwrap();
        assert_eq!(a.quantity, 3);
        assert_eq!(a.price, Money::from_cents(200));
        // position is preserved
        assert_eq!(cart.items()[0].id, "a");
    }

    #[test]
    fn test_add_item_rejects_invalid_input() {
        let cart = Cart::new();
        assert!(cart.add_item(item("", 200, 1)).is_err());
        assert!(cart.add_item(item("a", 200, 0)).is_err());
        assert!(cart.add_item(item("a", -1, 1)).is_err());
    }

    #[test]
    fn test_increment_and_decrement() {
        let cart = cart_with(vec![item("a", 200, 1)]);
        let up = cart.increment_quantity("a").unwrap();
        assert_eq!(up.get("a").unwrap().quantity, 2);
        assert_eq!(cart.get("a").unwrap().quantity, 1);

        let down = up.decrement_quantity("a").unwrap();
        assert_eq!(down.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_at_one_is_rejected() {
        let cart = cart_with(vec![item("a", 200, 1)]);
        let err = cart.decrement_quantity("a").unwrap_err();
        assert!(matches!(err, CoreError::QuantityBelowMinimum { .. }));
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_quantity_cap() {
        let cart = cart_with(vec![item("a", 200, MAX_ITEM_QUANTITY)]);
        assert!(matches!(
            cart.increment_quantity("a"),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(cart.add_item(item("a", 200, 1)).is_err());
    }

    #[test]
    fn test_update_quantity() {
        let cart = cart_with(vec![item("a", 200, 1)]);
        assert_eq!(cart.update_quantity("a", 5).unwrap().get("a").unwrap().quantity, 5);
        assert!(cart.update_quantity("a", 0).is_err());
        assert!(cart.update_quantity("missing", 2).is_err());
    }

    #[test]
    fn test_remove_item() {
        let cart = cart_with(vec![item("a", 200, 1), item("b", 100, 1)]);
        let cart = cart.remove_item("a").unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.get("a").is_none());
        assert!(matches!(
            cart.remove_item("a"),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let cart = cart_with(vec![item("a", 200, 1)]);
        assert!(cart.clear().is_empty());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total() {
        let cart = cart_with(vec![item("a", 200, 2), item("b", 150, 3)]);
        assert_eq!(cart.total().unwrap(), Money::from_cents(850));
    }

    #[test]
    fn test_add_item_rejects_price_above_maximum() {
        let cart = Cart::new();
        let err = cart.add_item(item("a", i64::MAX, 1)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(cart.add_item(item("a", MAX_ITEM_PRICE_CENTS + 1, 1)).is_err());

        let cart = cart.add_item(item("a", MAX_ITEM_PRICE_CENTS, 1)).unwrap();
        let cart = cart.update_quantity("a", MAX_ITEM_QUANTITY).unwrap();
        assert_eq!(
            cart.total().unwrap().cents(),
            MAX_ITEM_PRICE_CENTS * MAX_ITEM_QUANTITY
        );

        let overpriced = serde_json::from_str::<Cart>(r#"[{"id":"a","price":"99999999.00","qty":1}]"#);
        assert!(overpriced.is_err());
    }

    #[test]
    fn test_max_distinct_items() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart = cart.add_item(item(&format!("item-{}", i), 100, 1)).unwrap();
        }
        assert!(cart.add_item(item("one-too-many", 100, 1)).is_err());
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let cart: Cart = serde_json::from_str(r#"[{"id":"a","price":200,"qty":2}]"#).unwrap();
        assert_eq!(cart.total().unwrap().cents(), 400);

        let dup = serde_json::from_str::<Cart>(
            r#"[{"id":"a","price":200,"qty":2},{"id":"a","price":200,"qty":1}]"#,
        );
        assert!(dup.is_err());

        let zero = serde_json::from_str::<Cart>(r#"[{"id":"a","price":200,"qty":0}]"#);
        assert!(zero.is_err());
    }
}
