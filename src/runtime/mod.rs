//! UI-facing contract and runtime adapters.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_adapter;

pub use api::{
    Ack, BookRequest, BookResponse, ErrorResponse, FloorCell, Health, LotSummary, ParkingApi,
    ReleaseRequest, ReleaseResponse, DEFAULT_HISTORY_LIMIT,
};
#[cfg(feature = "tokio-runtime")]
pub use tokio_adapter::TokioParkingApi;
