//! Allocation service: the only writer of slot state.
//!
//! Every read-check-write sequence (book, release, reset) runs under one
//! `parking_lot::Mutex` scoped to the whole lot. The lock is coarse on purpose:
//! lots are small and each critical section is a couple of indexed statements.
//! Callers contending for it block without timeout, which caps write
//! throughput at one mutation at a time. Display reads go straight to the
//! store and may observe a slightly stale snapshot.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::slot::{validate_occupant_name, Booking, BookingId, Slot, SlotId, SlotStatus};
use crate::core::token::{RandomTokenSource, TokenSource};
use crate::core::{ParkingError, SlotStore};

/// Upper bound on token draws per booking before giving up.
pub const MAX_TOKEN_ATTEMPTS: usize = 32;

/// Mutually-exclusive booking and release over a [`SlotStore`].
///
/// Share one instance between request handlers (e.g. behind an `Arc`); each
/// instance owns its own allocation lock, so two services over the same store
/// do not exclude each other.
pub struct AllocationService<S> {
    store: Arc<S>,
    /// Allocation lock. Also owns the token source: tokens are only drawn inside the critical section.
    lock: Mutex<Box<dyn TokenSource>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl<S: SlotStore> AllocationService<S> {
    /// Create a service drawing tokens from the OS-seeded random source.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_token_source(store, RandomTokenSource::new())
    }

    /// Create a service with a caller-supplied token source.
    pub fn with_token_source(store: Arc<S>, tokens: impl TokenSource + 'static) -> Self {
        Self {
            store,
            lock: Mutex::new(Box::new(tokens)),
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Shared handle to the underlying store, for read-only observers.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// All slots ordered by id. Does not take the allocation lock.
    pub fn list_slots(&self) -> Result<Vec<Slot>, ParkingError> {
        self.store.list_slots()
    }

    /// Book the lowest-id available slot for `occupant_name` and return its token.
    pub fn book_slot(&self, occupant_name: &str) -> Result<BookingId, ParkingError> {
        self.book(occupant_name).map(|booking| booking.booking_id)
    }

    /// Book the lowest-id available slot, returning the full booking.
    pub fn book(&self, occupant_name: &str) -> Result<Booking, ParkingError> {
        let occupant = validate_occupant_name(occupant_name).inspect_err(|e| self.reject(e))?;

        let mut tokens = self.lock.lock();
        let slot = self.store.find_available().inspect_err(|e| self.reject(e))?;
        let booking_id = self.fresh_booking_id(&mut **tokens)?;
        self.store
            .update_slot(
                slot.id,
                SlotStatus::Occupied,
                Some(&occupant),
                Some(&booking_id),
            )
            .inspect_err(|e| self.reject(e))?;
        drop(tokens);

        tracing::info!(slot_id = slot.id, booking_id = %booking_id, "slot booked");
        self.audit(AuditAction::Book, Some(slot.id), Some(booking_id.clone()), None);
        Ok(Booking {
            slot_id: slot.id,
            booking_id,
            occupant_name: occupant,
        })
    }

    /// Free the slot held by `booking_id` and return its id.
    ///
    /// The token is trimmed and upper-cased first, so release is case-insensitive.
    pub fn release_slot(&self, booking_id: &str) -> Result<SlotId, ParkingError> {
        let booking_id = BookingId::parse(booking_id).inspect_err(|e| self.reject(e))?;

        let guard = self.lock.lock();
        let slot = self
            .store
            .find_by_booking_id(&booking_id)
            .inspect_err(|e| self.reject(e))?;
        self.store
            .update_slot(slot.id, SlotStatus::Available, None, None)
            .inspect_err(|e| self.reject(e))?;
        drop(guard);

        tracing::info!(slot_id = slot.id, booking_id = %booking_id, "slot released");
        self.audit(AuditAction::Release, Some(slot.id), Some(booking_id), None);
        Ok(slot.id)
    }

    /// Return every slot to AVAILABLE. Returns how many slots were occupied.
    ///
    /// Administrative operation; callers are expected to gate access.
    pub fn reset_system(&self) -> Result<usize, ParkingError> {
        let guard = self.lock.lock();
        let freed = self.store.reset_all()?;
        drop(guard);

        tracing::info!(freed, "all slots reset");
        self.audit(AuditAction::Reset, None, None, Some(format!("freed {freed}")));
        Ok(freed)
    }

    /// Draw tokens until one is not held by any occupied slot.
    ///
    /// Must be called with the allocation lock held.
    fn fresh_booking_id(&self, tokens: &mut dyn TokenSource) -> Result<BookingId, ParkingError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let candidate = BookingId::parse(&tokens.next_token()).map_err(|e| {
                ParkingError::Internal(format!("token source produced an invalid token: {e}"))
            })?;
            match self.store.find_by_booking_id(&candidate) {
                Err(ParkingError::BookingNotFound(_)) => return Ok(candidate),
                Ok(_) => {
                    tracing::warn!(attempt, "booking id collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
        Err(ParkingError::Internal(format!(
            "no unique booking id after {MAX_TOKEN_ATTEMPTS} attempts"
        )))
    }

    fn reject(&self, err: &ParkingError) {
        tracing::warn!("request rejected: {}", err);
        self.audit(AuditAction::Reject, None, None, Some(err.to_string()));
    }

    fn audit(
        &self,
        action: AuditAction,
        slot_id: Option<SlotId>,
        booking_id: Option<BookingId>,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            sink.record(build_audit_event(action, slot_id, booking_id, detail));
        }
    }
}
