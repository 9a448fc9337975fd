//! # Engine Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────────────────┐    │
//! │  │   Configuration     │        │     Business Rules (core)       │    │
//! │  │                     │        │                                 │    │
//! │  │  InvalidConfig      │        │  Core(CoreError)                │    │
//! │  │  ConfigLoadFailed   │        │   └── Validation → InvalidInput │    │
//! │  │  ConfigSaveFailed   │        │                                 │    │
//! │  └─────────────────────┘        └─────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use foodrun_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are inconsistent or out of range.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Returns true if the caller supplied malformed input.
    ///
    /// Callers surface these directly; nothing here is worth retrying.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EngineError::Core(err) if err.is_invalid_input())
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}
