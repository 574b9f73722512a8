//! Tests for builder modules

use smart_parking::builders::build_service;
use smart_parking::config::LotConfig;
use smart_parking::core::{AuditAction, ParkingError};

#[test]
fn test_build_in_memory_service() {
    let built = build_service(&LotConfig::in_memory(3)).unwrap();
    assert_eq!(built.service.list_slots().unwrap().len(), 3);

    let token = built.service.book_slot("Ann").unwrap();
    built.service.release_slot(token.as_str()).unwrap();

    let audit = built.audit.expect("audit trail enabled by default");
    let actions: Vec<_> = audit.events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Book, AuditAction::Release]);
}

#[test]
fn test_build_without_audit_trail() {
    let mut cfg = LotConfig::in_memory(1);
    cfg.audit_buffer = 0;
    let built = build_service(&cfg).unwrap();
    assert!(built.audit.is_none());
    assert!(built.service.book_slot("Ann").is_ok());
}

#[test]
fn test_build_rejects_invalid_config() {
    assert!(matches!(
        build_service(&LotConfig::in_memory(0)),
        Err(ParkingError::InvalidInput(_))
    ));
}

#[test]
fn test_build_sqlite_service() {
    let path = std::env::temp_dir().join(format!("smart-parking-builder-{}.db", uuid::Uuid::new_v4()));
    {
        let built = build_service(&LotConfig::sqlite(2, &path)).unwrap();
        built.service.book_slot("Ann").unwrap();
    }
    let built = build_service(&LotConfig::sqlite(2, &path)).unwrap();
    assert!(!built.service.list_slots().unwrap()[0].is_available());
    drop(built);

    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
