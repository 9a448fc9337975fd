//! # foodrun-engine: Runtime Shell around foodrun-core
//!
//! foodrun-core decides; this crate supplies what a decision needs from the
//! outside world: configured thresholds, the current instant, and logs.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         foodrun-engine                                  │
//! │                                                                         │
//! │   engine.toml ─┐                                                        │
//! │   FOODRUN_* ───┼──► EngineConfig ──┐                                    │
//! │   defaults ────┘                   ├──► OrderEngine ──► foodrun-core    │
//! │                     Clock ─────────┘        │                           │
//! │                                             ▼                           │
//! │                                      tracing events                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Engine configuration (TOML file, env overrides, defaults)
//! - [`clock`] - System and fixed clocks
//! - [`engine`] - `OrderEngine` facade
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use foodrun_engine::{EngineConfig, OrderEngine};
//!
//! let config = EngineConfig::load_or_default(None);
//! let engine = OrderEngine::with_system_clock(config)?;
//!
//! let availability = engine.availability()?;
//! for slot in &availability.open_slots {
//!     println!("{}", slot.period);
//! }
//! # Ok::<(), foodrun_engine::EngineError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{OrderEngine, SlotAvailability};
pub use error::{EngineError, EngineResult};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,foodrun_engine=debug";

/// Installs the global tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`]. Calling it twice
/// is harmless, the second install is ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
