//! In-memory slot store for development/testing.
//!
//! Same contract as the SQLite store, minus durability. The booking ledger is
//! bounded: once full, the oldest entry is dropped for each new booking.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::core::{
    check_slot_fields, BookingId, BookingRecord, BookingState, ParkingError, Slot, SlotId,
    SlotStatus, SlotStore,
};
use crate::util::clock::now_ms;

/// Default number of ledger entries an [`InMemorySlotStore`] keeps.
pub const DEFAULT_MEMORY_HISTORY: usize = 1024;

#[derive(Default)]
struct MemoryState {
    slots: Vec<Slot>,
    history: VecDeque<BookingRecord>,
}

impl MemoryState {
    fn close_active(&mut self, booking_id: &BookingId, state: BookingState, at_ms: u64) {
        if let Some(record) = self
            .history
            .iter_mut()
            .rev()
            .find(|r| r.state == BookingState::Active && &r.booking_id == booking_id)
        {
            record.state = state;
            record.closed_at_ms = Some(at_ms);
        }
    }
}

/// Slot store keeping everything behind a single mutex.
pub struct InMemorySlotStore {
    state: Mutex<MemoryState>,
    max_history: usize,
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_MEMORY_HISTORY)
    }
}

impl InMemorySlotStore {
    /// Create an empty store; call [`SlotStore::initialize`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store keeping at most `max_history` ledger entries.
    pub fn with_history_limit(max_history: usize) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            max_history,
        }
    }
}

impl SlotStore for InMemorySlotStore {
    fn initialize(&self, capacity: u32) -> Result<(), ParkingError> {
        if capacity == 0 {
            return Err(ParkingError::InvalidInput("capacity must be greater than 0".into()));
        }
        let mut state = self.state.lock();
        if state.slots.is_empty() {
            state.slots = (1..=capacity).map(Slot::available).collect();
            tracing::debug!("seeded {} in-memory slots", capacity);
            return Ok(());
        }
        let persisted = u32::try_from(state.slots.len()).unwrap_or(u32::MAX);
        if persisted != capacity {
            return Err(ParkingError::CapacityMismatch {
                configured: capacity,
                persisted,
            });
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<Slot>, ParkingError> {
        Ok(self.state.lock().slots.clone())
    }

    fn find_available(&self) -> Result<Slot, ParkingError> {
        self.state
            .lock()
            .slots
            .iter()
            .find(|s| s.is_available())
            .cloned()
            .ok_or(ParkingError::NoAvailableSlot)
    }

    fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Slot, ParkingError> {
        self.state
            .lock()
            .slots
            .iter()
            .find(|s| s.status == SlotStatus::Occupied && s.booking_id.as_ref() == Some(booking_id))
            .cloned()
            .ok_or_else(|| ParkingError::BookingNotFound(booking_id.to_string()))
    }

    fn update_slot(
        &self,
        id: SlotId,
        status: SlotStatus,
        occupant: Option<&str>,
        booking_id: Option<&BookingId>,
    ) -> Result<(), ParkingError> {
        check_slot_fields(status, occupant, booking_id)?;
        let mut state = self.state.lock();
        if let Some(token) = booking_id {
            if state
                .slots
                .iter()
                .any(|s| s.id != id && s.booking_id.as_ref() == Some(token))
            {
                return Err(ParkingError::Storage(format!(
                    "booking id {token} already held by another slot"
                )));
            }
        }
        let slot = state
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ParkingError::Storage(format!("slot {id} does not exist")))?;
        if status == SlotStatus::Occupied && !slot.is_available() {
            return Err(ParkingError::Storage(format!("slot {id} is already occupied")));
        }

        let displaced = slot.booking_id.take();
        slot.status = status;
        slot.occupant_name = occupant.map(str::to_string);
        slot.booking_id = booking_id.cloned();

        let now = now_ms();
        if let Some(previous) = displaced {
            state.close_active(&previous, BookingState::Completed, now);
        }
        if let (Some(token), Some(name)) = (booking_id, occupant) {
            if self.max_history > 0 {
                if state.history.len() >= self.max_history {
                    state.history.pop_front();
                }
                state.history.push_back(BookingRecord {
                    booking_id: token.clone(),
                    slot_id: id,
                    occupant_name: name.to_string(),
                    booked_at_ms: now,
                    closed_at_ms: None,
                    state: BookingState::Active,
                });
            }
        }
        Ok(())
    }

    fn reset_all(&self) -> Result<usize, ParkingError> {
        let mut state = self.state.lock();
        let occupied = state.slots.iter().filter(|s| !s.is_available()).count();
        for slot in &mut state.slots {
            *slot = Slot::available(slot.id);
        }
        let now = now_ms();
        for record in state
            .history
            .iter_mut()
            .filter(|r| r.state == BookingState::Active)
        {
            record.state = BookingState::Reset;
            record.closed_at_ms = Some(now);
        }
        Ok(occupied)
    }

    fn booking_history(&self, limit: usize) -> Result<Vec<BookingRecord>, ParkingError> {
        Ok(self
            .state
            .lock()
            .history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> BookingId {
        BookingId::parse(s).unwrap()
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = InMemorySlotStore::new();
        store.initialize(3).unwrap();
        store
            .update_slot(2, SlotStatus::Occupied, Some("Ann"), Some(&token("AAAA0002")))
            .unwrap();
        store.initialize(3).unwrap();

        let slots = store.list_slots().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[1].status, SlotStatus::Occupied);
    }

    #[test]
    fn test_initialize_rejects_capacity_change() {
        let store = InMemorySlotStore::new();
        store.initialize(3).unwrap();
        assert!(matches!(
            store.initialize(5),
            Err(ParkingError::CapacityMismatch { configured: 5, persisted: 3 })
        ));
        assert!(matches!(store.initialize(0), Err(ParkingError::InvalidInput(_))));
    }

    #[test]
    fn test_find_available_prefers_lowest_id() {
        let store = InMemorySlotStore::new();
        store.initialize(3).unwrap();
        store
            .update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&token("AAAA0001")))
            .unwrap();
        assert_eq!(store.find_available().unwrap().id, 2);
    }

    #[test]
    fn test_duplicate_token_is_refused() {
        let store = InMemorySlotStore::new();
        store.initialize(2).unwrap();
        let t = token("DUPL1CAT");
        store.update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&t)).unwrap();
        assert!(matches!(
            store.update_slot(2, SlotStatus::Occupied, Some("Bo"), Some(&t)),
            Err(ParkingError::Storage(_))
        ));
        assert!(store.find_available().unwrap().is_available());
    }

    #[test]
    fn test_ledger_tracks_release_and_reset() {
        let store = InMemorySlotStore::new();
        store.initialize(2).unwrap();
        store
            .update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&token("AAAA0001")))
            .unwrap();
        store
            .update_slot(2, SlotStatus::Occupied, Some("Bo"), Some(&token("BBBB0002")))
            .unwrap();
        store.update_slot(1, SlotStatus::Available, None, None).unwrap();
        assert_eq!(store.reset_all().unwrap(), 1);

        let history = store.booking_history(10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].booking_id.as_str(), "BBBB0002");
        assert_eq!(history[0].state, BookingState::Reset);
        assert_eq!(history[1].state, BookingState::Completed);
        assert!(history.iter().all(|r| r.closed_at_ms.is_some()));
    }

    #[test]
    fn test_occupied_slot_cannot_be_taken_again() {
        let store = InMemorySlotStore::new();
        store.initialize(1).unwrap();
        let ann = token("AAAA0001");
        store.update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&ann)).unwrap();

        assert!(matches!(
            store.update_slot(1, SlotStatus::Occupied, Some("Bo"), Some(&token("BBBB0002"))),
            Err(ParkingError::Storage(_))
        ));
        let slot = store.find_by_booking_id(&ann).unwrap();
        assert_eq!(slot.occupant_name.as_deref(), Some("Ann"));
        let history = store.booking_history(10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state, BookingState::Active);
    }

    #[test]
    fn test_history_is_bounded() {
        let store = InMemorySlotStore::with_history_limit(2);
        store.initialize(1).unwrap();
        for t in ["AAAA0001", "AAAA0002", "AAAA0003"] {
            store.update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&token(t))).unwrap();
            store.update_slot(1, SlotStatus::Available, None, None).unwrap();
        }
        let history = store.booking_history(10).unwrap();
        let ids: Vec<_> = history.iter().map(|r| r.booking_id.as_str()).collect();
        assert_eq!(ids, vec!["AAAA0003", "AAAA0002"]);
        assert!(history.iter().all(|r| r.state == BookingState::Completed));

        let silent = InMemorySlotStore::with_history_limit(0);
        silent.initialize(1).unwrap();
        silent.update_slot(1, SlotStatus::Occupied, Some("Ann"), Some(&token("AAAA0001"))).unwrap();
        assert!(silent.booking_history(10).unwrap().is_empty());
    }
}
