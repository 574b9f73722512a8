//! # Smart Parking
//!
//! Slot inventory for a fixed-size parking lot: which slots are occupied,
//! booking any free slot under concurrent requests, and releasing a slot by
//! the booking token handed out at booking time.
//!
//! ## Core Problem Solved
//!
//! Two requests racing for the last free slot must never both win. Every
//! read-check-write sequence runs inside one allocation lock owned by an
//! [`core::AllocationService`], and the durable store serializes its own
//! commits underneath it.
//!
//! ## Key Features
//!
//! - **Deterministic allocation**: the lowest-id free slot is always chosen
//! - **Unique booking tokens**: 8-character `[A-Z0-9]` ids, re-drawn on collision
//! - **Durable storage**: SQLite slot table and booking ledger survive restarts
//! - **Audit trail**: every booking, release, reset and rejection is recorded
//! - **Async-friendly**: optional tokio adapter runs store calls on the blocking pool
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use smart_parking::core::{AllocationService, ParkingError, SlotStore};
//! use smart_parking::infra::store::SqliteSlotStore;
//!
//! let store = Arc::new(SqliteSlotStore::open_in_memory()?);
//! store.initialize(2)?;
//! let service = AllocationService::new(store);
//!
//! let token = service.book_slot("Ada")?;
//! assert_eq!(service.release_slot(token.as_str())?, 1);
//! # Ok::<(), ParkingError>(())
//! ```
//!
//! For configuration-driven setup see [`builders::build_service`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Slot domain types, allocation service, and error taxonomy.
pub mod core;
/// Configuration models for the lot and its storage backend.
pub mod config;
/// Builders to construct the service from configuration.
pub mod builders;
/// Slot store backends.
pub mod infra;
/// UI-facing contract and runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;
