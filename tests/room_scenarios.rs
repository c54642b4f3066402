use std::cell::RefCell;
use std::rc::Rc;

use room_layout::{
    Catalog, CatalogEntry, Cell, Footprint, FurnitureCategory, GridModel, MemoryStore,
    PlacementError, PlacementEvent, PlacementRegistry, RoomConfig, RoomSession, Rotation,
    SkipReason, snapshot,
};

fn living_room() -> (PlacementRegistry, Catalog) {
    (
        PlacementRegistry::new(GridModel::new(10, 8).unwrap()),
        Catalog::builtin(),
    )
}

#[test]
fn sofa_and_coffee_table_scenario() {
    let (mut registry, catalog) = living_room();
    let sofa_entry = catalog.get("sofa_classic").unwrap();
    let table_entry = catalog.get("table_coffee").unwrap();

    let sofa = registry.place(sofa_entry, Cell::new(0, 0)).unwrap();
    let occupied = registry.grid().occupied_cells();
    let mut expected = Vec::new();
    for y in 0..2 {
        for x in 0..3 {
            expected.push(Cell::new(x, y));
        }
    }
    assert_eq!(occupied, expected);

    let err = registry.place(table_entry, Cell::new(2, 0)).unwrap_err();
    assert!(matches!(err, PlacementError::RegionOccupiedOrOutOfBounds { .. }));

    registry.place(table_entry, Cell::new(3, 0)).unwrap();

    registry.move_instance(&sofa.instance_id, Cell::new(0, 0)).unwrap();
    let err = registry
        .move_instance(&sofa.instance_id, Cell::new(1, 0))
        .unwrap_err();
    assert_eq!(
        err,
        PlacementError::RegionOccupiedOrOutOfBounds {
            origin: Cell::new(1, 0),
            footprint: Footprint::new(3, 2),
        }
    );
    assert_eq!(registry.get(&sofa.instance_id).unwrap().origin, Cell::new(0, 0));
}

#[test]
fn two_by_two_in_far_corner_is_out_of_bounds() {
    let (mut registry, _) = living_room();
    let armchair = CatalogEntry::new(
        "chair_armchair",
        "Armchair",
        FurnitureCategory::Chair,
        Footprint::new(2, 2),
        120,
    );
    assert!(matches!(
        registry.place(&armchair, Cell::new(9, 7)),
        Err(PlacementError::RegionOccupiedOrOutOfBounds { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn rotated_sofa_still_reserves_unrotated_footprint() {
    let (mut registry, catalog) = living_room();
    let sofa = registry
        .place(catalog.get("sofa_classic").unwrap(), Cell::new(0, 0))
        .unwrap();
    registry.rotate(&sofa.instance_id).unwrap();

    assert!(registry.grid().is_occupied(Cell::new(2, 0)));
    assert!(!registry.grid().is_occupied(Cell::new(0, 2)));
    assert!(
        registry
            .place(catalog.get("table_side").unwrap(), Cell::new(0, 2))
            .is_ok()
    );
}

#[test]
fn restore_after_catalog_change_degrades_gracefully() {
    let (mut registry, catalog) = living_room();
    registry
        .place(catalog.get("sofa_classic").unwrap(), Cell::new(0, 0))
        .unwrap();
    registry
        .place(catalog.get("table_coffee").unwrap(), Cell::new(3, 0))
        .unwrap();
    let saved = snapshot::decode(&snapshot::encode(&registry.snapshot()).unwrap()).unwrap();

    // A newer catalog widened the sofa; restored first, it now covers (3, 0).
    let mut updated: Vec<CatalogEntry> = catalog.entries().to_vec();
    for entry in updated.iter_mut() {
        if entry.id == "sofa_classic" {
            entry.footprint = Footprint::new(4, 2);
        }
    }

    let report = registry.restore(&saved, &updated);
    assert_eq!(report.restored.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].catalog_id, "table_coffee");
    assert_eq!(report.skipped[0].reason, SkipReason::RegionUnavailable);
    assert_eq!(registry.grid().occupied_count(), 8);
}

#[test]
fn session_round_trip_through_store() {
    let catalog = Catalog::builtin();
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut session = RoomSession::new(RoomConfig::default(), MemoryStore::new()).unwrap();
    let sink = Rc::clone(&events);
    session.subscribe(move |event: &PlacementEvent| sink.borrow_mut().push(event.clone()));

    session.set_edit_mode(true).unwrap();
    let tree = session
        .place(catalog.get("plant_tree").unwrap(), Cell::new(7, 5))
        .unwrap();
    session.select(&tree.instance_id).unwrap();
    session.rotate_selected().unwrap();
    session.rotate_selected().unwrap();
    session.set_edit_mode(false).unwrap();

    let kinds: Vec<&str> = events
        .borrow()
        .iter()
        .map(|event| match event {
            PlacementEvent::Placed(_) => "placed",
            PlacementEvent::Moved { .. } => "moved",
            PlacementEvent::Rotated { .. } => "rotated",
            PlacementEvent::Removed(_) => "removed",
            PlacementEvent::Restored { .. } => "restored",
            PlacementEvent::Selected(_) => "selected",
            PlacementEvent::Deselected => "deselected",
            PlacementEvent::EditModeChanged(_) => "edit_mode",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["edit_mode", "placed", "selected", "rotated", "rotated", "deselected", "edit_mode"]
    );
    assert_eq!(events.borrow()[0], PlacementEvent::EditModeChanged(true));
    assert_eq!(events.borrow()[2], PlacementEvent::Selected(tree.instance_id.clone()));
    assert_eq!(events.borrow()[6], PlacementEvent::EditModeChanged(false));
    assert_eq!(session.store().writes(), 1);

    let mut reopened =
        RoomSession::new(RoomConfig::default(), session.store().clone()).unwrap();
    let report = reopened.load(&catalog).unwrap();
    assert!(report.is_clean());
    let restored = reopened.registry().get(&tree.instance_id).unwrap();
    assert_eq!(restored.origin, Cell::new(7, 5));
    assert_eq!(restored.rotation, Rotation::Deg180);
    assert_eq!(reopened.registry().grid(), session.registry().grid());
}
