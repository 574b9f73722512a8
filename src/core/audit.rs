//! Audit sink implementations.
//!
//! Every mutation attempt the allocation service makes is reported here:
//! successful bookings, releases and resets, plus rejected requests.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::slot::{BookingId, SlotId};
use crate::util::clock::now_ms;

/// Kind of action an audit event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A slot was booked.
    Book,
    /// A slot was released.
    Release,
    /// All slots were reset by an administrator.
    Reset,
    /// A request was refused without mutating state.
    Reject,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken.
    pub action: AuditAction,
    /// Slot involved, if any.
    pub slot_id: Option<SlotId>,
    /// Booking token involved, if any.
    pub booking_id: Option<BookingId>,
    /// Timestamp milliseconds.
    pub created_at_ms: u64,
    /// Additional context (rejection reason, number of slots reset).
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: Mutex<VecDeque<AuditEvent>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` under the `smart_parking::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "smart_parking::audit",
            event_id = %event.event_id,
            action = ?event.action,
            slot_id = ?event.slot_id,
            booking_id = ?event.booking_id.as_ref().map(BookingId::as_str),
            detail = ?event.detail,
            "audit"
        );
    }
}

/// Helper to build an audit event stamped with a fresh id and the current time.
pub fn build_audit_event(
    action: AuditAction,
    slot_id: Option<SlotId>,
    booking_id: Option<BookingId>,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        action,
        slot_id,
        booking_id,
        created_at_ms: now_ms(),
        detail,
    }
}
