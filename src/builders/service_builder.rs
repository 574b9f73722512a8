//! Wire a store and allocation service from [`LotConfig`].

use std::sync::Arc;

use crate::config::{LotConfig, StoreBackendConfig};
use crate::core::{AllocationService, InMemoryAuditSink, ParkingError, SlotStore};
use crate::infra::store::{InMemorySlotStore, SqliteSlotStore};

/// A ready-to-use service plus the audit trail it writes to, if one was configured.
pub struct BuiltService {
    /// Allocation service over the configured backend.
    pub service: Arc<AllocationService<Box<dyn SlotStore>>>,
    /// In-memory audit trail, `None` when `audit_buffer` is 0.
    pub audit: Option<Arc<InMemoryAuditSink>>,
}

/// Open the configured backend without initializing it.
pub fn open_store(cfg: &StoreBackendConfig) -> Result<Box<dyn SlotStore>, ParkingError> {
    Ok(match cfg {
        StoreBackendConfig::InMemory => Box::new(InMemorySlotStore::new()),
        StoreBackendConfig::Sqlite { path } => Box::new(SqliteSlotStore::open(path)?),
    })
}

/// Validate configuration, open and initialize the store, and build the service.
pub fn build_service(cfg: &LotConfig) -> Result<BuiltService, ParkingError> {
    cfg.validate()
        .map_err(|e| ParkingError::InvalidInput(format!("config invalid: {e}")))?;

    let store = open_store(&cfg.store)?;
    store.initialize(cfg.capacity)?;
    tracing::info!(capacity = cfg.capacity, "parking lot initialized");

    let mut service = AllocationService::new(Arc::new(store));
    let audit = (cfg.audit_buffer > 0).then(|| Arc::new(InMemoryAuditSink::new(cfg.audit_buffer)));
    if let Some(sink) = &audit {
        service = service.with_audit(sink.clone());
    }
    Ok(BuiltService {
        service: Arc::new(service),
        audit,
    })
}
