use indexmap::IndexMap;

use crate::catalog::CatalogEntry;
use crate::config::RoomConfig;
use crate::error::{PlacementError, Result};
use crate::geometry::{Cell, Rotation};
use crate::grid::GridModel;
use crate::logging::{LogLevel, Logger, PLACEMENT_TARGET, emit, json_kv};
use crate::metrics::{MetricSnapshot, PlacementMetrics};
use crate::snapshot::SaveRecord;

use super::events::ObserverList;
use super::{InstanceId, ObserverId, PlacedInstance, PlacementEvent, PlacementObserver};

/// Owns every placed instance and keeps the grid's occupancy in step with
/// them. Occupancy is always the union of the current instances' footprints.
pub struct PlacementRegistry {
    pub(super) grid: GridModel,
    pub(super) instances: IndexMap<InstanceId, PlacedInstance>,
    pub(super) metrics: PlacementMetrics,
    pub(super) logger: Option<Logger>,
    observers: ObserverList,
}

impl PlacementRegistry {
    pub fn new(grid: GridModel) -> Self {
        Self {
            grid,
            instances: IndexMap::new(),
            metrics: PlacementMetrics::new(),
            logger: None,
            observers: ObserverList::default(),
        }
    }

    pub fn from_config(config: &RoomConfig) -> Result<Self> {
        config.validate()?;
        let grid = GridModel::new(config.width, config.height)?;
        let mut registry = Self::new(grid);
        registry.logger = config.logger.clone();
        Ok(registry)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn set_logger(&mut self, logger: Option<Logger>) {
        self.logger = logger;
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn get(&self, instance_id: &InstanceId) -> Option<&PlacedInstance> {
        self.instances.get(instance_id)
    }

    /// Instances in insertion order.
    pub fn instances(&self) -> impl Iterator<Item = &PlacedInstance> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The instance whose footprint covers `cell`, if any.
    pub fn instance_at(&self, cell: Cell) -> Option<&PlacedInstance> {
        if !self.grid.is_occupied(cell) {
            return None;
        }
        self.instances
            .values()
            .find(|instance| instance.region().contains(cell))
    }

    pub fn metrics(&self) -> &PlacementMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricSnapshot {
        self.metrics.snapshot(self.instances.len())
    }

    pub fn subscribe<O>(&mut self, observer: O) -> ObserverId
    where
        O: PlacementObserver + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Place a new instance of `entry` with its footprint anchored at `origin`.
    pub fn place(
        &mut self,
        entry: &CatalogEntry,
        origin: Cell,
    ) -> std::result::Result<PlacedInstance, PlacementError> {
        if let Err(err) = entry.validate() {
            return Err(self.reject(err));
        }
        if !self.grid.is_region_legal(origin, entry.footprint) {
            return Err(self.reject(PlacementError::RegionOccupiedOrOutOfBounds {
                origin,
                footprint: entry.footprint,
            }));
        }

        let instance = self.commit(InstanceId::generate(), entry, origin, Rotation::Deg0);
        self.metrics.record_placement();
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            PLACEMENT_TARGET,
            "placed",
            [
                json_kv("instance_id", instance.instance_id.as_str()),
                json_kv("catalog_id", instance.catalog_id.as_str()),
                json_kv("x", origin.x),
                json_kv("y", origin.y),
            ],
        );
        self.observers
            .dispatch(&PlacementEvent::Placed(instance.clone()));
        Ok(instance)
    }

    /// Move an instance so its footprint is anchored at `new_origin`.
    ///
    /// Occupied cells of the target region are tolerated only when they
    /// belong to the mover's own current footprint, so overlapping shifts and
    /// identity moves succeed while any contact with another item fails.
    pub fn move_instance(
        &mut self,
        instance_id: &InstanceId,
        new_origin: Cell,
    ) -> std::result::Result<(), PlacementError> {
        let Some(current) = self.instances.get(instance_id) else {
            return Err(self.reject(PlacementError::UnknownInstance(instance_id.clone())));
        };
        let own = current.region();
        let footprint = current.footprint;

        if !self
            .grid
            .is_region_legal_except(new_origin, footprint, &own)
        {
            return Err(self.reject(PlacementError::RegionOccupiedOrOutOfBounds {
                origin: new_origin,
                footprint,
            }));
        }

        self.grid.set_occupancy(own.origin, footprint, false);
        self.grid.set_occupancy(new_origin, footprint, true);
        if let Some(instance) = self.instances.get_mut(instance_id) {
            instance.origin = new_origin;
        }

        self.metrics.record_move();
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            PLACEMENT_TARGET,
            "moved",
            [
                json_kv("instance_id", instance_id.as_str()),
                json_kv("x", new_origin.x),
                json_kv("y", new_origin.y),
            ],
        );
        self.observers.dispatch(&PlacementEvent::Moved {
            instance_id: instance_id.clone(),
            from: own.origin,
            to: new_origin,
        });
        Ok(())
    }

    /// Advance the instance's rotation by a quarter turn. Occupancy is not
    /// re-validated since rotation never changes the footprint.
    pub fn rotate(
        &mut self,
        instance_id: &InstanceId,
    ) -> std::result::Result<Rotation, PlacementError> {
        let Some(instance) = self.instances.get_mut(instance_id) else {
            return Err(self.reject(PlacementError::UnknownInstance(instance_id.clone())));
        };
        instance.rotation = instance.rotation.next();
        let rotation = instance.rotation;

        self.metrics.record_rotation();
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            PLACEMENT_TARGET,
            "rotated",
            [
                json_kv("instance_id", instance_id.as_str()),
                json_kv("rotation", rotation.degrees()),
            ],
        );
        self.observers.dispatch(&PlacementEvent::Rotated {
            instance_id: instance_id.clone(),
            rotation,
        });
        Ok(rotation)
    }

    pub fn remove(
        &mut self,
        instance_id: &InstanceId,
    ) -> std::result::Result<PlacedInstance, PlacementError> {
        let Some(instance) = self.instances.shift_remove(instance_id) else {
            return Err(self.reject(PlacementError::UnknownInstance(instance_id.clone())));
        };
        self.grid
            .set_occupancy(instance.origin, instance.footprint, false);

        self.metrics.record_removal();
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            PLACEMENT_TARGET,
            "removed",
            [json_kv("instance_id", instance_id.as_str())],
        );
        self.observers
            .dispatch(&PlacementEvent::Removed(instance.clone()));
        Ok(instance)
    }

    /// Save records for every instance, in insertion order.
    pub fn snapshot(&self) -> Vec<SaveRecord> {
        self.instances.values().map(SaveRecord::from).collect()
    }

    /// Drop every instance and clear the grid. Observers are not notified.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.grid.reset();
    }

    pub(super) fn commit(
        &mut self,
        instance_id: InstanceId,
        entry: &CatalogEntry,
        origin: Cell,
        rotation: Rotation,
    ) -> PlacedInstance {
        let instance = PlacedInstance {
            instance_id: instance_id.clone(),
            catalog_id: entry.id.clone(),
            footprint: entry.footprint,
            origin,
            rotation,
        };
        self.grid.set_occupancy(origin, entry.footprint, true);
        self.instances.insert(instance_id, instance.clone());
        instance
    }

    pub(crate) fn dispatch(&mut self, event: &PlacementEvent) {
        self.observers.dispatch(event);
    }

    fn reject(&mut self, err: PlacementError) -> PlacementError {
        self.metrics.record_rejection();
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            PLACEMENT_TARGET,
            "rejected",
            [json_kv("reason", err.to_string())],
        );
        err
    }
}

impl std::fmt::Debug for PlacementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementRegistry")
            .field("grid", &self.grid)
            .field("instances", &self.instances)
            .field("metrics", &self.metrics)
            .field("observers", &self.observers.len())
            .finish()
    }
}
