use thiserror::Error;

use crate::catalog::CatalogLookup;
use crate::geometry::{Cell, Rotation};
use crate::logging::{LogLevel, RESTORE_TARGET, emit, json_kv};
use crate::snapshot::SaveRecord;

use super::{InstanceId, PlacedInstance, PlacementEvent, PlacementRegistry};

/// Why a saved record was left out of a restored layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("catalog entry is unknown")]
    UnknownCatalog,
    #[error("catalog entry is malformed")]
    InvalidCatalogEntry,
    #[error("rotation {0} is not a multiple of 90 degrees")]
    InvalidRotation(i32),
    #[error("instance id already restored")]
    DuplicateInstance,
    #[error("region is occupied or out of bounds")]
    RegionUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreIssue {
    /// Position of the record in the restored sequence.
    pub index: usize,
    pub instance_id: String,
    pub catalog_id: String,
    pub reason: SkipReason,
}

/// Outcome of a restore. Restores always complete; bad records land in
/// `skipped` instead of failing the whole layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: Vec<InstanceId>,
    pub skipped: Vec<RestoreIssue>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl PlacementRegistry {
    /// Replace the current layout with `records`, replayed in order.
    pub fn restore<C>(&mut self, records: &[SaveRecord], catalog: &C) -> RestoreReport
    where
        C: CatalogLookup + ?Sized,
    {
        self.clear();
        let mut report = RestoreReport::default();

        for (index, record) in records.iter().enumerate() {
            match self.restore_record(record, catalog) {
                Ok(instance) => report.restored.push(instance.instance_id),
                Err(reason) => {
                    emit(
                        self.logger.as_ref(),
                        LogLevel::Warn,
                        RESTORE_TARGET,
                        "record_skipped",
                        [
                            json_kv("index", index),
                            json_kv("instance_id", record.instance_id.as_str()),
                            json_kv("catalog_id", record.catalog_id.as_str()),
                            json_kv("reason", reason.to_string()),
                        ],
                    );
                    report.skipped.push(RestoreIssue {
                        index,
                        instance_id: record.instance_id.clone(),
                        catalog_id: record.catalog_id.clone(),
                        reason,
                    });
                }
            }
        }

        let restored = report.restored.len();
        let skipped = report.skipped.len();
        self.metrics.record_restore(restored, skipped);
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            RESTORE_TARGET,
            "restored",
            [json_kv("restored", restored), json_kv("skipped", skipped)],
        );
        self.dispatch(&PlacementEvent::Restored { restored, skipped });
        report
    }

    fn restore_record<C>(
        &mut self,
        record: &SaveRecord,
        catalog: &C,
    ) -> Result<PlacedInstance, SkipReason>
    where
        C: CatalogLookup + ?Sized,
    {
        let entry = catalog
            .lookup(&record.catalog_id)
            .ok_or(SkipReason::UnknownCatalog)?;
        entry
            .validate()
            .map_err(|_| SkipReason::InvalidCatalogEntry)?;
        let rotation = Rotation::from_degrees(record.rotation)
            .ok_or(SkipReason::InvalidRotation(record.rotation))?;

        let instance_id = if record.instance_id.trim().is_empty() {
            InstanceId::generate()
        } else {
            InstanceId::from(record.instance_id.as_str())
        };
        if self.instances.contains_key(&instance_id) {
            return Err(SkipReason::DuplicateInstance);
        }

        let origin = Cell::new(record.origin_x, record.origin_y);
        if !self.grid.is_region_legal(origin, entry.footprint) {
            return Err(SkipReason::RegionUnavailable);
        }
        Ok(self.commit(instance_id, entry, origin, rotation))
    }
}
