//! Read-only furniture catalog.
//!
//! The engine only ever reads catalog entries. [`CatalogLookup`] is the seam
//! restore goes through, so embedders can back it with whatever data source
//! they ship; [`Catalog::builtin`] provides the stock furniture set.

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::geometry::Footprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureCategory {
    Sofa,
    Chair,
    Table,
    Bed,
    Storage,
    Lamp,
    Plant,
    Decoration,
    Rug,
    WallArt,
}

/// Static description of a piece of furniture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub category: FurnitureCategory,
    pub footprint: Footprint,
    pub price: u32,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: FurnitureCategory,
        footprint: Footprint,
        price: u32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            category,
            footprint,
            price,
            is_available: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    /// Entries need a non-blank id and a footprint of at least 1x1.
    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.id.trim().is_empty() || self.footprint.is_empty() {
            return Err(PlacementError::InvalidCatalogEntry {
                catalog_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Lookup of catalog entries by id.
pub trait CatalogLookup {
    fn lookup(&self, catalog_id: &str) -> Option<&CatalogEntry>;
}

impl CatalogLookup for [CatalogEntry] {
    fn lookup(&self, catalog_id: &str) -> Option<&CatalogEntry> {
        self.iter().find(|entry| entry.id == catalog_id)
    }
}

impl CatalogLookup for Vec<CatalogEntry> {
    fn lookup(&self, catalog_id: &str) -> Option<&CatalogEntry> {
        self.as_slice().lookup(catalog_id)
    }
}

/// Ordered collection of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        use FurnitureCategory::*;

        let stock: [(&str, &str, FurnitureCategory, u32, (u32, u32)); 21] = [
            ("sofa_classic", "Classic Sofa", Sofa, 150, (3, 2)),
            ("sofa_modern", "Modern Sofa", Sofa, 200, (3, 2)),
            ("sofa_corner", "Corner Sofa", Sofa, 350, (4, 3)),
            ("table_coffee", "Coffee Table", Table, 80, (2, 1)),
            ("table_dining", "Dining Table", Table, 200, (3, 2)),
            ("table_side", "Side Table", Table, 50, (1, 1)),
            ("chair_dining", "Dining Chair", Chair, 60, (1, 1)),
            ("chair_armchair", "Armchair", Chair, 120, (2, 2)),
            ("chair_office", "Office Chair", Chair, 100, (1, 1)),
            ("lamp_floor", "Floor Lamp", Lamp, 70, (1, 1)),
            ("lamp_table", "Table Lamp", Lamp, 45, (1, 1)),
            ("lamp_chandelier", "Chandelier", Lamp, 300, (2, 2)),
            ("plant_small", "Small Plant", Plant, 30, (1, 1)),
            ("plant_large", "Large Plant", Plant, 80, (1, 2)),
            ("plant_tree", "Indoor Tree", Plant, 150, (2, 3)),
            ("rug_basic", "Basic Rug", Rug, 40, (2, 2)),
            ("rug_large", "Large Rug", Rug, 100, (4, 3)),
            ("rug_runner", "Runner Rug", Rug, 60, (4, 1)),
            ("deco_painting", "Wall Painting", Decoration, 75, (2, 2)),
            ("deco_vase", "Decorative Vase", Decoration, 35, (1, 1)),
            ("deco_bookshelf", "Bookshelf", Decoration, 180, (2, 3)),
        ];

        let entries = stock
            .into_iter()
            .map(|(id, name, category, price, (cols, rows))| {
                CatalogEntry::new(id, name, category, Footprint::new(cols, rows), price)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, catalog_id: &str) -> Option<&CatalogEntry> {
        self.entries.lookup(catalog_id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn by_category(&self, category: FurnitureCategory) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogLookup for Catalog {
    fn lookup(&self, catalog_id: &str) -> Option<&CatalogEntry> {
        self.get(catalog_id)
    }
}
