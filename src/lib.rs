//! Grid-based furniture placement engine for a single virtual room.
//!
//! [`GridModel`] tracks which cells are occupied; [`PlacementRegistry`] owns
//! the placed instances and keeps occupancy derivable from them. A
//! [`RoomSession`] adds edit mode, selection and autosave for interactive
//! front ends. Everything is single-threaded and synchronous.

pub mod catalog;
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, CatalogLookup, FurnitureCategory};
pub use config::{ConfigError, DEFAULT_STORAGE_KEY, RoomConfig};
pub use coords::GridMapping;
pub use error::{PlacementError, Result, RoomError};
pub use geometry::{Cell, Footprint, Region, Rotation};
pub use grid::{GridError, GridModel};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, PlacementMetrics};
pub use registry::{
    InstanceId, ObserverId, PlacedInstance, PlacementEvent, PlacementObserver, PlacementRegistry,
    RestoreIssue, RestoreReport, SkipReason,
};
pub use session::RoomSession;
pub use snapshot::{SaveFile, SaveRecord};
pub use store::{MemoryStore, RoomStore, StoreError};
