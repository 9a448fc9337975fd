//! # Engine Configuration
//!
//! Business thresholds and the delivery slot catalog.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOODRUN_LEAD_BUFFER_MINUTES=90                                     │
//! │     FOODRUN_MINIMUM_ORDER=5.00                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/foodrun/engine.toml (Linux)                              │
//! │     ~/Library/Application Support/sg.foodrun.foodrun/engine.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     UTC+8, 70 min buffer, closes 19:45, 8 km, $6/$9, $4.00 minimum     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [schedule]
//! utc_offset_minutes = 480
//! lead_buffer_minutes = 70
//! closing_time = "19:45"
//! fasting_start = { month = 4, day = 12 }
//! fasting_end = { month = 5, day = 12 }
//!
//! [delivery]
//! threshold_km = 8.0
//! low_fee_cents = 600
//! high_fee_cents = 900
//!
//! [order]
//! minimum_per_store_cents = 400
//!
//! [[slots]]
//! orderBy = "11:30"
//! period = "12:30 - 2:30"
//! ```
//!
//! Every section and field is optional; missing ones take the defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveTime;
use foodrun_core::{DeliveryRules, DeliverySlot, Money, OrderRules, ScheduleRules};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

const CONFIG_FILE_NAME: &str = "engine.toml";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_UTC_OFFSET_MINUTES: &str = "FOODRUN_UTC_OFFSET_MINUTES";
pub const ENV_LEAD_BUFFER_MINUTES: &str = "FOODRUN_LEAD_BUFFER_MINUTES";
pub const ENV_CLOSING_TIME: &str = "FOODRUN_CLOSING_TIME";
pub const ENV_DELIVERY_THRESHOLD_KM: &str = "FOODRUN_DELIVERY_THRESHOLD_KM";
pub const ENV_MINIMUM_ORDER: &str = "FOODRUN_MINIMUM_ORDER";

// =============================================================================
// Default Slot Catalog
// =============================================================================

fn slot(hour: u32, minute: u32, period: &str) -> Option<DeliverySlot> {
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| DeliverySlot::new(t, period))
}

/// The three daily delivery runs.
pub fn default_slots() -> Vec<DeliverySlot> {
    [
        slot(11, 30, "12:30 - 2:30"),
        slot(14, 0, "3 - 5"),
        slot(17, 0, "6 - 8"),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Timezone, lead buffer, closing time, fasting window.
    #[serde(default)]
    pub schedule: ScheduleRules,

    /// Distance threshold and fees.
    #[serde(default)]
    pub delivery: DeliveryRules,

    /// Per-store minimum purchase.
    #[serde(default)]
    pub order: OrderRules,

    /// Delivery slot catalog, in display order.
    #[serde(default = "default_slots")]
    pub slots: Vec<DeliverySlot>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schedule: ScheduleRules::default(),
            delivery: DeliveryRules::default(),
            order: OrderRules::default(),
            slots: default_slots(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Does not validate.
    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |e: foodrun_core::ValidationError| EngineError::InvalidConfig(e.to_string());

        self.schedule.validate().map_err(invalid)?;
        self.delivery.validate().map_err(invalid)?;
        self.order.validate().map_err(invalid)?;

        let mut periods = HashSet::with_capacity(self.slots.len());
        for slot in &self.slots {
            if slot.period.trim().is_empty() {
                return Err(EngineError::InvalidConfig(format!(
                    "slot with order-by {} has an empty period",
                    slot.order_by.format("%H:%M")
                )));
            }
            if !periods.insert(slot.period.as_str()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate slot period '{}'",
                    slot.period
                )));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Values that fail to parse are logged and skipped; `validate` runs
    /// afterwards on whatever was accepted.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_UTC_OFFSET_MINUTES) {
            match raw.trim().parse::<i32>() {
                Ok(minutes) => {
                    debug!(minutes, "Overriding UTC offset from environment");
                    self.schedule.utc_offset_minutes = minutes;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_UTC_OFFSET_MINUTES),
            }
        }

        if let Some(raw) = lookup(ENV_LEAD_BUFFER_MINUTES) {
            match raw.trim().parse::<i64>() {
                Ok(minutes) => {
                    debug!(minutes, "Overriding lead buffer from environment");
                    self.schedule.lead_buffer_minutes = minutes;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_LEAD_BUFFER_MINUTES),
            }
        }

        if let Some(raw) = lookup(ENV_CLOSING_TIME) {
            match NaiveTime::parse_from_str(raw.trim(), "%H:%M") {
                Ok(time) => {
                    debug!(closing_time = %time, "Overriding closing time from environment");
                    self.schedule.closing_time = time;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_CLOSING_TIME),
            }
        }

        if let Some(raw) = lookup(ENV_DELIVERY_THRESHOLD_KM) {
            match raw.trim().parse::<f64>() {
                Ok(km) => {
                    debug!(km, "Overriding delivery threshold from environment");
                    self.delivery.threshold_km = km;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_DELIVERY_THRESHOLD_KM),
            }
        }

        if let Some(raw) = lookup(ENV_MINIMUM_ORDER) {
            match raw.parse::<Money>() {
                Ok(minimum) => {
                    debug!(minimum = %minimum, "Overriding minimum order from environment");
                    self.order.minimum_per_store = minimum;
                }
                Err(e) => warn!(error = %e, "Ignoring unparseable {}", ENV_MINIMUM_ORDER),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("sg", "foodrun", "foodrun")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
