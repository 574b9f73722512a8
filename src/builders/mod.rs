//! Builders to construct the allocation service from configuration.

pub mod service_builder;

pub use service_builder::{build_service, open_store, BuiltService};
