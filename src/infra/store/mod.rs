//! Slot store backends.

pub mod memory;
pub mod sqlite;

pub use memory::{InMemorySlotStore, DEFAULT_MEMORY_HISTORY};
pub use sqlite::SqliteSlotStore;
