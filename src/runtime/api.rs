//! UI-facing contract over the allocation service.
//!
//! Plain request/response models: the rendering layer decides how they are
//! transported or displayed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{
    AllocationService, BookingId, BookingRecord, ParkingError, Slot, SlotId, SlotStatus, SlotStore,
};

/// Default number of ledger entries returned by [`ParkingApi::admin_history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One cell of the floor map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorCell {
    /// Slot identifier.
    pub slot_id: SlotId,
    /// Current occupancy.
    pub status: SlotStatus,
}

/// Booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    /// Name to register the slot under.
    pub occupant_name: String,
}

/// Successful booking response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    /// Token the occupant must keep to release the slot.
    pub booking_id: BookingId,
    /// Slot assigned.
    pub slot_id: SlotId,
}

/// Release request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Token returned at booking time; case-insensitive.
    pub booking_id: String,
}

/// Successful release response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Slot that was freed.
    pub slot_id: SlotId,
}

/// Acknowledgement of an administrative reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Number of occupied slots that were freed.
    pub freed: usize,
}

/// Occupancy figures for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSummary {
    /// Lot capacity.
    pub total: usize,
    /// Free slots.
    pub available: usize,
    /// Held slots.
    pub occupied: usize,
}

impl LotSummary {
    /// Summarize a slot listing.
    pub fn from_slots(slots: &[Slot]) -> Self {
        let available = slots.iter().filter(|s| s.is_available()).count();
        Self {
            total: slots.len(),
            available,
            occupied: slots.len() - available,
        }
    }

    /// Occupied share in percent, 0 for an empty lot.
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.occupied as f64 * 100.0 / self.total as f64
    }
}

/// Error payload suitable for returning to a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the user can correct the request and retry.
    pub recoverable: bool,
}

impl From<&ParkingError> for ErrorResponse {
    fn from(err: &ParkingError) -> Self {
        let code = match err {
            ParkingError::InvalidInput(_) => "invalid_input",
            ParkingError::NoAvailableSlot => "no_available_slot",
            ParkingError::BookingNotFound(_) => "booking_not_found",
            ParkingError::Storage(_) => "storage_error",
            ParkingError::CapacityMismatch { .. } => "capacity_mismatch",
            ParkingError::Internal(_) => "internal_error",
        };
        Self {
            code: code.into(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Store error behind an unhealthy report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read/write contract exposed to the UI collaborator.
pub struct ParkingApi<S> {
    service: Arc<AllocationService<S>>,
}

impl<S> Clone for ParkingApi<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: SlotStore> ParkingApi<S> {
    /// Wrap a shared service.
    pub const fn new(service: Arc<AllocationService<S>>) -> Self {
        Self { service }
    }

    /// Underlying service.
    pub const fn service(&self) -> &Arc<AllocationService<S>> {
        &self.service
    }

    /// Slot ids with their status, ordered by id.
    pub fn get_floor_map(&self) -> Result<Vec<FloorCell>, ParkingError> {
        Ok(self
            .service
            .list_slots()?
            .into_iter()
            .map(|slot| FloorCell {
                slot_id: slot.id,
                status: slot.status,
            })
            .collect())
    }

    /// Book any available slot.
    pub fn book(&self, req: &BookRequest) -> Result<BookResponse, ParkingError> {
        let booking = self.service.book(&req.occupant_name)?;
        Ok(BookResponse {
            booking_id: booking.booking_id,
            slot_id: booking.slot_id,
        })
    }

    /// Release the slot held by a booking token.
    pub fn release(&self, req: &ReleaseRequest) -> Result<ReleaseResponse, ParkingError> {
        let slot_id = self.service.release_slot(&req.booking_id)?;
        Ok(ReleaseResponse { slot_id })
    }

    /// Full slot detail for the admin view.
    pub fn admin_list(&self) -> Result<Vec<Slot>, ParkingError> {
        self.service.list_slots()
    }

    /// Return every slot to AVAILABLE.
    pub fn admin_reset(&self) -> Result<Ack, ParkingError> {
        let freed = self.service.reset_system()?;
        Ok(Ack { freed })
    }

    /// Newest booking ledger entries first.
    pub fn admin_history(&self, limit: Option<usize>) -> Result<Vec<BookingRecord>, ParkingError> {
        self.service
            .store()
            .booking_history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    /// Occupancy figures.
    pub fn summary(&self) -> Result<LotSummary, ParkingError> {
        Ok(LotSummary::from_slots(&self.service.list_slots()?))
    }

    /// Report whether the store answers queries.
    pub fn health(&self) -> Health {
        match self.service.list_slots() {
            Ok(_) => Health {
                ok: true,
                error: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "health check failed");
                Health {
                    ok: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
