//! Configuration models for the lot and its storage backend.

pub mod lot;

pub use lot::{LotConfig, StoreBackendConfig, DEFAULT_AUDIT_BUFFER};
