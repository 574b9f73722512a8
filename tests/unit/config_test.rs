//! Tests for configuration validation

use smart_parking::config::{LotConfig, StoreBackendConfig, DEFAULT_AUDIT_BUFFER};

#[test]
fn test_lot_config_validation() {
    assert!(LotConfig::in_memory(10).validate().is_ok());
    assert!(LotConfig::sqlite(10, "parking.db").validate().is_ok());
    assert!(LotConfig::in_memory(0).validate().is_err());
}

#[test]
fn test_lot_config_from_json_defaults() {
    let cfg = LotConfig::from_json_str(r#"{ "capacity": 9, "store": "in_memory" }"#).unwrap();
    assert_eq!(cfg.capacity, 9);
    assert_eq!(cfg.store, StoreBackendConfig::InMemory);
    assert_eq!(cfg.audit_buffer, DEFAULT_AUDIT_BUFFER);
}

#[test]
fn test_lot_config_rejects_unknown_backend() {
    assert!(LotConfig::from_json_str(r#"{ "capacity": 9, "store": "postgres" }"#).is_err());
}

#[test]
fn test_lot_config_round_trips_through_json() {
    let cfg = LotConfig::sqlite(4, "/var/lib/parking/lot.db");
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(LotConfig::from_json_str(&json).unwrap(), cfg);
}
