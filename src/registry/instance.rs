use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Cell, Footprint, Region, Rotation};

/// Opaque identity of a placed item. Generated once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A catalog item committed to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedInstance {
    pub instance_id: InstanceId,
    pub catalog_id: String,
    pub footprint: Footprint,
    pub origin: Cell,
    pub rotation: Rotation,
}

impl PlacedInstance {
    /// Cells reserved on the grid. Rotation never changes this.
    pub fn region(&self) -> Region {
        Region::new(self.origin, self.footprint)
    }
}
