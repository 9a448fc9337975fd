//! Config file loading and saving against a real filesystem.

use chrono::{TimeZone, Utc};
use foodrun_engine::{EngineConfig, EngineError, FixedClock, OrderEngine};
use tempfile::tempdir;

#[test]
fn load_reads_config_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("engine.toml");
    std::fs::write(
        &path,
        r#"
[schedule]
lead_buffer_minutes = 30

[[slots]]
orderBy = "10:30"
period = "11 - 12"

[[slots]]
orderBy = "12:00"
period = "1 - 2"
"#,
    )
    .expect("write config");

    let config = EngineConfig::load(Some(path)).expect("load");
    assert_eq!(config.schedule.lead_buffer_minutes, 30);
    assert_eq!(config.slots.len(), 2);

    // 10:00 local: 10:30 is now cut off, 12:00 is not
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 2, 0, 0).unwrap();
    let engine = OrderEngine::new(config, FixedClock::new(now)).expect("engine");
    let open = engine.open_slots().expect("slots");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].period, "1 - 2");
}

#[test]
fn load_missing_file_uses_defaults() {
    let dir = tempdir().expect("tempdir");
    let config = EngineConfig::load(Some(dir.path().join("absent.toml"))).expect("load");
    assert_eq!(config.slots, EngineConfig::default().slots);
    assert_eq!(config.delivery, EngineConfig::default().delivery);
}

#[test]
fn load_rejects_malformed_and_invalid_files() {
    let dir = tempdir().expect("tempdir");

    let malformed = dir.path().join("malformed.toml");
    std::fs::write(&malformed, "[schedule\nlead_buffer_minutes = ").expect("write");
    assert!(matches!(
        EngineConfig::load(Some(malformed)),
        Err(EngineError::ConfigLoadFailed(_))
    ));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "[delivery]\nlow_fee_cents = 1000\nhigh_fee_cents = 500\n")
        .expect("write");
    assert!(matches!(
        EngineConfig::load(Some(invalid.clone())),
        Err(EngineError::InvalidConfig(_))
    ));

    let fallback = EngineConfig::load_or_default(Some(invalid));
    assert_eq!(fallback.delivery, EngineConfig::default().delivery);
}

#[test]
fn save_then_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("engine.toml");

    let mut config = EngineConfig::default();
    config.schedule.lead_buffer_minutes = 45;
    config.delivery.threshold_km = 6.5;
    config.save(Some(path.clone())).expect("save");

    let loaded = EngineConfig::load(Some(path)).expect("load");
    assert_eq!(loaded.schedule.lead_buffer_minutes, 45);
    assert_eq!(loaded.delivery.threshold_km, 6.5);
    assert_eq!(loaded.slots, config.slots);
}
