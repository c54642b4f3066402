//! Placement registry orchestrator.
//!
//! `core` holds the registry and its place/move/rotate/remove operations,
//! `restore` rebuilds state from saved records, `events` carries the observer
//! plumbing and `instance` the record types.

mod core;
mod events;
mod instance;
mod restore;

pub use core::PlacementRegistry;
pub use events::{ObserverId, PlacementEvent, PlacementObserver};
pub use instance::{InstanceId, PlacedInstance};
pub use restore::{RestoreIssue, RestoreReport, SkipReason};
