//! Error types shared across the crate.

mod types;

pub use types::{PlacementError, Result, RoomError};
