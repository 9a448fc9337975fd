//! # Validation Module
//!
//! Input validation for FoodRun.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web frontend                                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ids, quantities, prices, coordinates                              │
//! │  └── Rejects malformed snapshots before any arithmetic                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (schedule, delivery, order)                   │
//! │  └── Assume their inputs passed layer 2                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use foodrun_core::validation::{validate_item_id, validate_quantity};
//!
//! validate_item_id("menu-123").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_ITEM_PRICE_CENTS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a cart/menu item id.
///
/// Ids are document ids from the menu collection, so the only rule is that
/// they are not blank.
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    validate_id("item id", id)
}

/// Validates a store id.
pub fn validate_store_id(id: &str) -> ValidationResult<()> {
    validate_id("store id", id)
}

/// Validates a market id.
pub fn validate_market_id(id: &str) -> ValidationResult<()> {
    validate_id("market id", id)
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Digits only, optional leading `+`, spaces ignored
/// - At least 4 digits (invoice numbers embed the first four)
pub fn validate_phone_number(phone: &str) -> ValidationResult<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "phone number".to_string(),
        });
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone number".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if digits.len() < 4 {
        return Err(ValidationError::InvalidFormat {
            field: "phone number".to_string(),
            reason: "must have at least 4 digits".to_string(),
        });
    }

    Ok(digits.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Must not exceed MAX_ITEM_PRICE_CENTS ($10,000.00)
/// - Zero is allowed (free add-ons)
///
/// ## Example
/// ```rust
/// use foodrun_core::money::Money;
/// use foodrun_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(350)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_ITEM_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_ITEM_PRICE_CENTS,
        });
    }

    Ok(())
}

fn validate_degrees(field: &str, value: f64, limit: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < -limit || value > limit {
        return Err(ValidationError::OutOfRangeFloat {
            field: field.to_string(),
            min: -limit,
            max: limit,
            value,
        });
    }
    Ok(())
}

/// Validates a latitude in decimal degrees (finite, within ±90).
pub fn validate_latitude(latitude: f64) -> ValidationResult<()> {
    validate_degrees("latitude", latitude, 90.0)
}

/// Validates a longitude in decimal degrees (finite, within ±180).
pub fn validate_longitude(longitude: f64) -> ValidationResult<()> {
    validate_degrees("longitude", longitude, 180.0)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before adding another distinct item.
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids() {
        assert!(validate_item_id("menu-1").is_ok());
        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
        assert!(validate_store_id("store1").is_ok());
        assert!(validate_store_id("").is_err());
        assert!(validate_market_id("").is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert_eq!(validate_phone_number("9123 4567").unwrap(), "91234567");
        assert_eq!(validate_phone_number("+6591234567").unwrap(), "6591234567");
        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("912").is_err());
        assert!(validate_phone_number("9123-4567").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
        assert!(validate_price(Money::from_cents(MAX_ITEM_PRICE_CENTS)).is_ok());
        assert!(validate_price(Money::from_cents(MAX_ITEM_PRICE_CENTS + 1)).is_err());
        assert!(validate_price(Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude(1.3521).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.5).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.1).is_err());
        assert!(validate_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(99).is_ok());
        assert!(validate_cart_size(100).is_err());
    }
}
