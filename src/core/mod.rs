//! Slot domain types, the allocation service and its collaborators.

pub mod allocation;
pub mod audit;
pub mod error;
pub mod slot;
pub mod store;
pub mod token;

pub use allocation::{AllocationService, MAX_TOKEN_ATTEMPTS};
pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use error::{AppResult, ParkingError};
pub use slot::{
    check_slot_fields, validate_occupant_name, Booking, BookingId, BookingRecord, BookingState,
    Slot, SlotId, SlotStatus, BOOKING_ID_ALPHABET, BOOKING_ID_LEN, MAX_OCCUPANT_NAME_LEN,
};
pub use store::SlotStore;
pub use token::{generate_token, RandomTokenSource, TokenSource};
