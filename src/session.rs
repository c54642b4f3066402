//! Interactive editing session for one room.
//!
//! A [`RoomSession`] is owned by the embedding application and handed to
//! whichever collaborators need it. It layers edit mode, selection and
//! autosave on top of a [`PlacementRegistry`], and maps world positions from
//! the presentation layer onto grid cells.

use crate::catalog::{CatalogEntry, CatalogLookup};
use crate::config::RoomConfig;
use crate::coords::GridMapping;
use crate::error::{PlacementError, Result};
use crate::geometry::{Cell, Rotation};
use crate::logging::{LogLevel, Logger, METRICS_TARGET, SESSION_TARGET, emit, json_kv};
use crate::registry::{
    InstanceId, ObserverId, PlacedInstance, PlacementEvent, PlacementObserver, PlacementRegistry,
    RestoreReport,
};
use crate::snapshot::{self, SaveRecord};
use crate::store::RoomStore;

type PlacementResult<T> = std::result::Result<T, PlacementError>;

pub struct RoomSession<S> {
    registry: PlacementRegistry,
    mapping: GridMapping,
    store: S,
    storage_key: String,
    logger: Option<Logger>,
    edit_mode: bool,
    selected: Option<InstanceId>,
    last_saved: Option<blake3::Hash>,
}

impl<S: RoomStore> RoomSession<S> {
    pub fn new(config: RoomConfig, store: S) -> Result<Self> {
        let registry = PlacementRegistry::from_config(&config)?;
        Ok(Self {
            registry,
            mapping: config.mapping(),
            store,
            storage_key: config.storage_key,
            logger: config.logger,
            edit_mode: false,
            selected: None,
            last_saved: None,
        })
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn mapping(&self) -> GridMapping {
        self.mapping
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe<O>(&mut self, observer: O) -> ObserverId
    where
        O: PlacementObserver + 'static,
    {
        self.registry.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Rebuild the room from the store. A missing payload leaves the room
    /// as it is and yields an empty report.
    pub fn load<C>(&mut self, catalog: &C) -> Result<RestoreReport>
    where
        C: CatalogLookup + ?Sized,
    {
        let Some(payload) = self.store.load(&self.storage_key)? else {
            emit(
                self.logger.as_ref(),
                LogLevel::Info,
                SESSION_TARGET,
                "no_saved_room",
                [json_kv("key", self.storage_key.as_str())],
            );
            return Ok(RestoreReport::default());
        };

        let records = match snapshot::decode(&payload) {
            Ok(records) => records,
            Err(err) => {
                emit(
                    self.logger.as_ref(),
                    LogLevel::Error,
                    SESSION_TARGET,
                    "load_failed",
                    [json_kv("error", err.to_string())],
                );
                return Err(err);
            }
        };

        self.clear_selection();
        let report = self.registry.restore(&records, catalog);
        self.last_saved = Some(snapshot::fingerprint(&records));
        Ok(report)
    }

    /// Write the current layout unless it matches what was last saved or
    /// loaded. Returns whether the store was written.
    pub fn save(&mut self) -> Result<bool> {
        let records: Vec<SaveRecord> = self.registry.snapshot();
        let hash = snapshot::fingerprint(&records);
        if self.last_saved == Some(hash) {
            return Ok(false);
        }

        let payload = snapshot::encode(&records)?;
        self.store.save(&self.storage_key, &payload)?;
        self.last_saved = Some(hash);

        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            SESSION_TARGET,
            "room_saved",
            [json_kv("items", records.len())],
        );
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(self.registry.metrics_snapshot().to_log_event(METRICS_TARGET));
        }
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        self.last_saved != Some(snapshot::fingerprint(&self.registry.snapshot()))
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Leaving edit mode drops the selection and saves the room. Observers
    /// get `EditModeChanged` after the save, and only when the mode flips.
    pub fn set_edit_mode(&mut self, edit_mode: bool) -> Result<()> {
        let changed = self.edit_mode != edit_mode;
        self.edit_mode = edit_mode;
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            SESSION_TARGET,
            "edit_mode",
            [json_kv("enabled", edit_mode)],
        );
        let saved = if edit_mode {
            Ok(())
        } else {
            self.clear_selection();
            self.save().map(|_| ())
        };
        if changed {
            self.registry
                .dispatch(&PlacementEvent::EditModeChanged(edit_mode));
        }
        saved
    }

    pub fn toggle_edit_mode(&mut self) -> Result<()> {
        self.set_edit_mode(!self.edit_mode)
    }

    /// Select an instance. Outside edit mode this is ignored and returns
    /// `Ok(false)`.
    pub fn select(&mut self, instance_id: &InstanceId) -> PlacementResult<bool> {
        if !self.edit_mode {
            return Ok(false);
        }
        if self.registry.get(instance_id).is_none() {
            return Err(PlacementError::UnknownInstance(instance_id.clone()));
        }
        self.selected = Some(instance_id.clone());
        self.registry
            .dispatch(&PlacementEvent::Selected(instance_id.clone()));
        Ok(true)
    }

    pub fn deselect(&mut self) {
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.registry.dispatch(&PlacementEvent::Deselected);
        }
    }

    pub fn selected(&self) -> Option<&PlacedInstance> {
        self.selected
            .as_ref()
            .and_then(|id| self.registry.get(id))
    }

    pub fn place(&mut self, entry: &CatalogEntry, origin: Cell) -> PlacementResult<PlacedInstance> {
        self.registry.place(entry, origin)
    }

    /// Place `entry` at the cell nearest to a world position.
    pub fn drop_at(&mut self, entry: &CatalogEntry, world: (f32, f32)) -> PlacementResult<PlacedInstance> {
        let origin = self.mapping.world_to_grid(world);
        self.registry.place(entry, origin)
    }

    /// Programmatic move, available in or out of edit mode like `place`.
    /// Pointer input goes through [`RoomSession::drag_to`].
    pub fn move_instance(&mut self, instance_id: &InstanceId, origin: Cell) -> PlacementResult<()> {
        self.registry.move_instance(instance_id, origin)
    }

    /// Finish a drag at a world position and return the cell it landed on.
    /// Outside edit mode the drag is ignored and yields `Ok(None)`. On
    /// rejection the instance keeps its previous origin.
    pub fn drag_to(
        &mut self,
        instance_id: &InstanceId,
        world: (f32, f32),
    ) -> PlacementResult<Option<Cell>> {
        if !self.edit_mode {
            return Ok(None);
        }
        let target = self.mapping.world_to_grid(world);
        self.registry.move_instance(instance_id, target)?;
        Ok(Some(target))
    }

    pub fn rotate(&mut self, instance_id: &InstanceId) -> PlacementResult<Rotation> {
        self.registry.rotate(instance_id)
    }

    pub fn remove(&mut self, instance_id: &InstanceId) -> PlacementResult<PlacedInstance> {
        let removed = self.registry.remove(instance_id)?;
        if self.selected.as_ref() == Some(instance_id) {
            self.clear_selection();
        }
        Ok(removed)
    }

    pub fn rotate_selected(&mut self) -> PlacementResult<Option<Rotation>> {
        match self.selected.clone() {
            Some(id) => self.registry.rotate(&id).map(Some),
            None => Ok(None),
        }
    }

    pub fn remove_selected(&mut self) -> PlacementResult<Option<PlacedInstance>> {
        match self.selected.clone() {
            Some(id) => self.remove(&id).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::DEFAULT_STORAGE_KEY;
    use crate::error::RoomError;
    use crate::store::MemoryStore;

    fn session() -> RoomSession<MemoryStore> {
        RoomSession::new(RoomConfig::default(), MemoryStore::new()).unwrap()
    }

    fn sofa() -> CatalogEntry {
        Catalog::builtin().get("sofa_classic").cloned().unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = RoomSession::new(RoomConfig::default().with_size(0, 0), MemoryStore::new())
            .err()
            .unwrap();
        assert!(matches!(err, RoomError::Config(_)));
    }

    #[test]
    fn select_requires_edit_mode() {
        let mut session = session();
        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();

        assert_eq!(session.select(&sofa.instance_id), Ok(false));
        assert!(session.selected().is_none());

        session.set_edit_mode(true).unwrap();
        assert_eq!(session.select(&sofa.instance_id), Ok(true));
        assert_eq!(session.selected().unwrap().instance_id, sofa.instance_id);
        assert!(session.select(&InstanceId::from("ghost")).is_err());
    }

    #[test]
    fn leaving_edit_mode_deselects_and_saves() {
        let mut session = session();
        session.set_edit_mode(true).unwrap();
        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();
        session.select(&sofa.instance_id).unwrap();

        session.toggle_edit_mode().unwrap();
        assert!(!session.is_edit_mode());
        assert!(session.selected().is_none());
        assert_eq!(session.store().writes(), 1);
        assert!(session.store().get(DEFAULT_STORAGE_KEY).unwrap().contains("sofa_classic"));
    }

    #[test]
    fn save_skips_unchanged_layout() {
        let mut session = session();
        session.place(&sofa(), Cell::new(0, 0)).unwrap();
        assert!(session.is_dirty());
        assert!(session.save().unwrap());
        assert!(!session.is_dirty());
        assert!(!session.save().unwrap());
        assert_eq!(session.store().writes(), 1);
    }

    #[test]
    fn selected_actions_follow_selection() {
        let mut session = session();
        session.set_edit_mode(true).unwrap();
        assert_eq!(session.rotate_selected(), Ok(None));

        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();
        session.select(&sofa.instance_id).unwrap();
        assert_eq!(session.rotate_selected(), Ok(Some(Rotation::Deg90)));

        let removed = session.remove_selected().unwrap().unwrap();
        assert_eq!(removed.instance_id, sofa.instance_id);
        assert!(session.selected().is_none());
        assert_eq!(session.registry().grid().occupied_count(), 0);
    }

    #[test]
    fn removing_selected_instance_clears_selection() {
        let mut session = session();
        session.set_edit_mode(true).unwrap();
        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();
        session.select(&sofa.instance_id).unwrap();
        session.remove(&sofa.instance_id).unwrap();
        assert!(session.selected().is_none());
        assert_eq!(session.remove_selected(), Ok(None));
    }

    #[test]
    fn drag_snaps_to_nearest_cell_or_stays_put() {
        let config = RoomConfig::default().with_cell_size(2.0).with_grid_origin(-10.0, -8.0);
        let mut session = RoomSession::new(config, MemoryStore::new()).unwrap();
        session.set_edit_mode(true).unwrap();
        let sofa = session.drop_at(&sofa(), (-9.2, -7.9)).unwrap();
        assert_eq!(sofa.origin, Cell::new(0, 0));

        assert_eq!(
            session.drag_to(&sofa.instance_id, (-6.1, -5.8)),
            Ok(Some(Cell::new(2, 1)))
        );
        assert!(session.drag_to(&sofa.instance_id, (8.0, 0.0)).is_err());
        assert_eq!(
            session.registry().get(&sofa.instance_id).unwrap().origin,
            Cell::new(2, 1)
        );
    }

    #[test]
    fn drag_outside_edit_mode_is_ignored() {
        let mut session = session();
        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();
        let grid_before = session.registry().grid().clone();

        assert_eq!(session.drag_to(&sofa.instance_id, (4.0, 4.0)), Ok(None));
        assert_eq!(session.drag_to(&InstanceId::from("ghost"), (4.0, 4.0)), Ok(None));
        assert_eq!(session.registry().get(&sofa.instance_id).unwrap().origin, Cell::new(0, 0));
        assert_eq!(session.registry().grid(), &grid_before);
        assert_eq!(session.registry().metrics_snapshot().moves, 0);
    }

    #[test]
    fn selection_changes_reach_observers() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut session = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |event: &PlacementEvent| sink.borrow_mut().push(event.clone()));

        let sofa = session.place(&sofa(), Cell::new(0, 0)).unwrap();
        session.select(&sofa.instance_id).unwrap();
        session.deselect();
        session.set_edit_mode(true).unwrap();
        session.set_edit_mode(true).unwrap();
        session.select(&sofa.instance_id).unwrap();
        session.remove(&sofa.instance_id).unwrap();
        session.deselect();

        assert_eq!(
            *seen.borrow(),
            vec![
                PlacementEvent::Placed(sofa.clone()),
                PlacementEvent::EditModeChanged(true),
                PlacementEvent::Selected(sofa.instance_id.clone()),
                PlacementEvent::Removed(sofa.clone()),
                PlacementEvent::Deselected,
            ]
        );
    }

    #[test]
    fn load_without_payload_is_empty() {
        let mut session = session();
        let report = session.load(&Catalog::builtin()).unwrap();
        assert!(report.restored.is_empty() && report.is_clean());
    }

    #[test]
    fn load_surfaces_corrupt_payload() {
        let mut store = MemoryStore::new();
        store.save(DEFAULT_STORAGE_KEY, "{broken").unwrap();
        let mut session = RoomSession::new(RoomConfig::default(), store).unwrap();
        assert!(matches!(
            session.load(&Catalog::builtin()),
            Err(RoomError::Codec(_))
        ));
    }

    #[test]
    fn reload_restores_saved_layout() {
        let catalog = Catalog::builtin();
        let mut first = session();
        let sofa = first.place(&sofa(), Cell::new(4, 4)).unwrap();
        first.rotate(&sofa.instance_id).unwrap();
        first.save().unwrap();

        let store = first.store().clone();
        let mut second = RoomSession::new(RoomConfig::default(), store).unwrap();
        let report = second.load(&catalog).unwrap();
        assert!(report.is_clean());
        assert!(!second.is_dirty());
        let restored = second.registry().get(&sofa.instance_id).unwrap();
        assert_eq!(restored.origin, Cell::new(4, 4));
        assert_eq!(restored.rotation, Rotation::Deg90);
    }
}
