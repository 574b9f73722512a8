//! Tests for error types

use smart_parking::core::ParkingError;

#[test]
fn test_error_messages() {
    assert_eq!(
        ParkingError::InvalidInput("empty name".into()).to_string(),
        "invalid input: empty name"
    );
    assert_eq!(ParkingError::NoAvailableSlot.to_string(), "no available slot");
    assert_eq!(
        ParkingError::BookingNotFound("ABCD1234".into()).to_string(),
        "booking not found: ABCD1234"
    );
    assert_eq!(
        ParkingError::Storage("disk full".into()).to_string(),
        "storage error: disk full"
    );
    assert_eq!(
        ParkingError::CapacityMismatch { configured: 5, persisted: 9 }.to_string(),
        "capacity mismatch: configured 5, persisted 9"
    );
}

#[test]
fn test_recoverable_classification() {
    assert!(ParkingError::InvalidInput(String::new()).is_recoverable());
    assert!(ParkingError::NoAvailableSlot.is_recoverable());
    assert!(ParkingError::BookingNotFound(String::new()).is_recoverable());
    assert!(!ParkingError::Storage(String::new()).is_recoverable());
    assert!(!ParkingError::Internal(String::new()).is_recoverable());
}

#[test]
fn test_sqlite_errors_become_storage_errors() {
    let err: ParkingError = rusqlite::Error::InvalidQuery.into();
    assert!(matches!(err, ParkingError::Storage(_)));
}
