//! Tokio adapter for async callers.
//!
//! Store access is blocking, so every call is shipped to the runtime's
//! blocking pool instead of stalling an async worker thread.

use tokio::runtime::Handle;

use crate::core::{BookingRecord, ParkingError, Slot, SlotStore};
use crate::runtime::api::{
    Ack, BookRequest, BookResponse, FloorCell, LotSummary, ParkingApi, ReleaseRequest,
    ReleaseResponse,
};

/// Async facade over [`ParkingApi`] running on a tokio runtime.
pub struct TokioParkingApi<S> {
    api: ParkingApi<S>,
    handle: Handle,
}

impl<S> Clone for TokioParkingApi<S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl<S: SlotStore + 'static> TokioParkingApi<S> {
    /// Create an adapter bound to a tokio runtime handle.
    pub const fn new(api: ParkingApi<S>, handle: Handle) -> Self {
        Self { api, handle }
    }

    /// Create an adapter bound to the runtime the caller is running on.
    pub fn try_current(api: ParkingApi<S>) -> Result<Self, ParkingError> {
        let handle = Handle::try_current()
            .map_err(|e| ParkingError::Internal(format!("no tokio runtime: {e}")))?;
        Ok(Self::new(api, handle))
    }

    async fn run<T, F>(&self, f: F) -> Result<T, ParkingError>
    where
        T: Send + 'static,
        F: FnOnce(ParkingApi<S>) -> Result<T, ParkingError> + Send + 'static,
    {
        let api = self.api.clone();
        self.handle
            .spawn_blocking(move || f(api))
            .await
            .map_err(|e| ParkingError::Internal(format!("blocking task failed: {e}")))?
    }

    /// See [`ParkingApi::get_floor_map`].
    pub async fn get_floor_map(&self) -> Result<Vec<FloorCell>, ParkingError> {
        self.run(|api| api.get_floor_map()).await
    }

    /// See [`ParkingApi::book`].
    pub async fn book(&self, req: BookRequest) -> Result<BookResponse, ParkingError> {
        self.run(move |api| api.book(&req)).await
    }

    /// See [`ParkingApi::release`].
    pub async fn release(&self, req: ReleaseRequest) -> Result<ReleaseResponse, ParkingError> {
        self.run(move |api| api.release(&req)).await
    }

    /// See [`ParkingApi::admin_list`].
    pub async fn admin_list(&self) -> Result<Vec<Slot>, ParkingError> {
        self.run(|api| api.admin_list()).await
    }

    /// See [`ParkingApi::admin_reset`].
    pub async fn admin_reset(&self) -> Result<Ack, ParkingError> {
        self.run(|api| api.admin_reset()).await
    }

    /// See [`ParkingApi::admin_history`].
    pub async fn admin_history(&self, limit: Option<usize>) -> Result<Vec<BookingRecord>, ParkingError> {
        self.run(move |api| api.admin_history(limit)).await
    }

    /// See [`ParkingApi::summary`].
    pub async fn summary(&self) -> Result<LotSummary, ParkingError> {
        self.run(|api| api.summary()).await
    }
}
