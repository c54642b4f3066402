//! Stored record format for a room layout.
//!
//! A layout is saved as `{"items": [...]}` where each item is
//! `{instanceId, catalogId, originX, originY, rotation}`. Transport is left to
//! a [`RoomStore`](crate::store::RoomStore); this module only encodes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::PlacedInstance;

/// One placed instance as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub instance_id: String,
    pub catalog_id: String,
    pub origin_x: i32,
    pub origin_y: i32,
    pub rotation: i32,
}

impl From<&PlacedInstance> for SaveRecord {
    fn from(instance: &PlacedInstance) -> Self {
        Self {
            instance_id: instance.instance_id.to_string(),
            catalog_id: instance.catalog_id.clone(),
            origin_x: instance.origin.x,
            origin_y: instance.origin.y,
            rotation: instance.rotation.degrees(),
        }
    }
}

/// Named collection wrapping the ordered record sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default)]
    pub items: Vec<SaveRecord>,
}

pub fn encode(records: &[SaveRecord]) -> Result<String> {
    let file = SaveFile {
        items: records.to_vec(),
    };
    Ok(serde_json::to_string(&file)?)
}

pub fn decode(payload: &str) -> Result<Vec<SaveRecord>> {
    let file: SaveFile = serde_json::from_str(payload)?;
    Ok(file.items)
}

/// Content hash of a record sequence. Order matters.
pub fn fingerprint(records: &[SaveRecord]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        for part in [record.instance_id.as_str(), record.catalog_id.as_str()] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.update(&record.origin_x.to_le_bytes());
        hasher.update(&record.origin_y.to_le_bytes());
        hasher.update(&record.rotation.to_le_bytes());
    }
    hasher.finalize()
}
