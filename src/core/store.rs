//! Persistent slot store abstraction.

use crate::core::slot::{BookingId, BookingRecord, Slot, SlotId, SlotStatus};
use crate::core::ParkingError;

/// Durable, queryable slot table.
///
/// Implementations must serialize their own writes; the allocation service
/// reduces contention but several readers may hit the store concurrently.
pub trait SlotStore: Send + Sync {
    /// Create the slot table if absent and seed `capacity` AVAILABLE rows when empty.
    ///
    /// Safe to call on every startup. A non-empty table with a different row
    /// count fails with [`ParkingError::CapacityMismatch`] and is left untouched.
    fn initialize(&self, capacity: u32) -> Result<(), ParkingError>;

    /// All slots ordered by id.
    fn list_slots(&self) -> Result<Vec<Slot>, ParkingError>;

    /// The lowest-id AVAILABLE slot, or [`ParkingError::NoAvailableSlot`].
    fn find_available(&self) -> Result<Slot, ParkingError>;

    /// The OCCUPIED slot holding `booking_id`, or [`ParkingError::BookingNotFound`].
    fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Slot, ParkingError>;

    /// Overwrite status, occupant and token of one slot.
    ///
    /// Occupying is compare-and-set: it only succeeds on a slot that is
    /// AVAILABLE at commit time, otherwise it fails with
    /// [`ParkingError::Storage`] and changes nothing.
    ///
    /// Also maintains the booking ledger: occupying opens an ACTIVE record,
    /// vacating closes the record of the token that was displaced.
    fn update_slot(
        &self,
        id: SlotId,
        status: SlotStatus,
        occupant: Option<&str>,
        booking_id: Option<&BookingId>,
    ) -> Result<(), ParkingError>;

    /// Return every slot to AVAILABLE atomically. Returns how many were occupied.
    fn reset_all(&self) -> Result<usize, ParkingError>;

    /// Newest ledger entries first, at most `limit`.
    fn booking_history(&self, limit: usize) -> Result<Vec<BookingRecord>, ParkingError>;
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn initialize(&self, capacity: u32) -> Result<(), ParkingError> {
        (**self).initialize(capacity)
    }

    fn list_slots(&self) -> Result<Vec<Slot>, ParkingError> {
        (**self).list_slots()
    }

    fn find_available(&self) -> Result<Slot, ParkingError> {
        (**self).find_available()
    }

    fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Slot, ParkingError> {
        (**self).find_by_booking_id(booking_id)
    }

    fn update_slot(
        &self,
        id: SlotId,
        status: SlotStatus,
        occupant: Option<&str>,
        booking_id: Option<&BookingId>,
    ) -> Result<(), ParkingError> {
        (**self).update_slot(id, status, occupant, booking_id)
    }

    fn reset_all(&self) -> Result<usize, ParkingError> {
        (**self).reset_all()
    }

    fn booking_history(&self, limit: usize) -> Result<Vec<BookingRecord>, ParkingError> {
        (**self).booking_history(limit)
    }
}
