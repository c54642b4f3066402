use thiserror::Error;

use crate::coords::GridMapping;
use crate::logging::Logger;

pub const DEFAULT_STORAGE_KEY: &str = "RoomData";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("room must be at least 1x1 cells, got {width}x{height}")]
    EmptyRoom { width: u32, height: u32 },
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),
    #[error("grid origin must be finite")]
    InvalidOrigin,
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Configuration knobs for a room.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Room width in cells.
    pub width: u32,
    /// Room height in cells.
    pub height: u32,
    /// World units per cell, used only by the coordinate mapping.
    pub cell_size: f32,
    /// World position of cell (0, 0).
    pub grid_origin: (f32, f32),
    /// Key the layout is stored under.
    pub storage_key: String,
    /// Optional structured logger shared by the registry and session.
    pub logger: Option<Logger>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 8,
            cell_size: 1.0,
            grid_origin: (0.0, 0.0),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            logger: None,
        }
    }
}

impl RoomConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_grid_origin(mut self, x: f32, y: f32) -> Self {
        self.grid_origin = (x, y);
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyRoom {
                width: self.width,
                height: self.height,
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.grid_origin.0.is_finite() || !self.grid_origin.1.is_finite() {
            return Err(ConfigError::InvalidOrigin);
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    pub fn mapping(&self) -> GridMapping {
        GridMapping::new(self.grid_origin, self.cell_size)
    }
}
