//! Tests for audit sinks

use std::sync::Arc;

use smart_parking::core::{
    build_audit_event, AllocationService, AuditAction, AuditSink, BookingId, InMemoryAuditSink,
    SlotStore, TracingAuditSink,
};
use smart_parking::infra::store::InMemorySlotStore;

#[test]
fn test_build_audit_event() {
    let token = BookingId::parse("ABCD1234").unwrap();
    let event = build_audit_event(AuditAction::Book, Some(3), Some(token.clone()), None);
    assert_eq!(event.action, AuditAction::Book);
    assert_eq!(event.slot_id, Some(3));
    assert_eq!(event.booking_id, Some(token));
    assert!(!event.event_id.is_empty());
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_service_reports_rejections() {
    let store = Arc::new(InMemorySlotStore::new());
    store.initialize(1).unwrap();
    let sink = Arc::new(InMemoryAuditSink::new(10));
    let svc = AllocationService::new(store).with_audit(sink.clone());

    let _ = svc.book_slot("  ");
    let _ = svc.release_slot("UNKNOWN1");

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.action == AuditAction::Reject));
    assert!(events[0].detail.as_deref().unwrap().contains("occupant name"));
    assert!(events[1].detail.as_deref().unwrap().contains("UNKNOWN1"));
}

#[test]
fn test_tracing_sink_accepts_events() {
    TracingAuditSink.record(build_audit_event(AuditAction::Reset, None, None, Some("freed 0".into())));
}
