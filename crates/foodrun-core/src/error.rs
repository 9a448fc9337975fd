//! # Error Types
//!
//! Domain-specific error types for foodrun-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  foodrun-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and business rule failures                │
//! │  └── ValidationError  - Malformed input (the InvalidInput kind)        │
//! │                                                                         │
//! │  foodrun-engine errors (separate crate)                                │
//! │  └── EngineError      - Config loading, wraps CoreError                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, store id, field)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is retryable: the core performs no I/O

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item is not in the cart.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(String),

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Decrementing would take the quantity below one.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Nasi Lemak × 1
    ///      │
    ///      ▼
    /// Tap "−"
    ///      │
    ///      ▼
    /// QuantityBelowMinimum { item_id: "nasi-lemak" }
    ///      │
    ///      ▼
    /// UI offers "Remove item?" instead
    /// ```
    #[error("Quantity of {item_id} cannot go below 1; remove the item instead")]
    QuantityBelowMinimum { item_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if the caller supplied malformed input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant is the InvalidInput kind: the request is rejected
/// synchronously instead of producing a zero or NaN result.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Floating point value is out of range (or not finite).
    #[error("{field} must be a finite number between {min} and {max}, got {value}")]
    OutOfRangeFloat {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid time, invalid price string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate cart item id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Referenced value does not exist.
    #[error("{field} '{value}' not found")]
    NotFound { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
