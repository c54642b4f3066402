use thiserror::Error;

use crate::config::ConfigError;
use crate::geometry::{Cell, Footprint};
use crate::grid::GridError;
use crate::logging::LoggingError;
use crate::registry::InstanceId;
use crate::store::StoreError;

/// Unified result type for the room layout crate.
pub type Result<T> = std::result::Result<T, RoomError>;

/// Recoverable outcomes of a rejected placement request. A call that returns
/// one of these has left the registry and grid untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("catalog entry `{catalog_id}` is malformed")]
    InvalidCatalogEntry { catalog_id: String },
    #[error("region {footprint} at {origin} is occupied or out of bounds")]
    RegionOccupiedOrOutOfBounds { origin: Cell, footprint: Footprint },
    #[error("instance `{0}` not found")]
    UnknownInstance(InstanceId),
}

/// Errors surfaced by the room layout engine and its collaborators.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementError),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("room store error: {0}")]
    Store(#[from] StoreError),
    #[error("room data could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    Logging(#[from] LoggingError),
}
