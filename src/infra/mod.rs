//! Infrastructure adapters for slot storage backends.

pub mod store;

pub use store::{InMemorySlotStore, SqliteSlotStore};
