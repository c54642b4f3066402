use thiserror::Error;

use crate::geometry::{Cell, Footprint, Region};

/// Errors raised while constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
}

/// Boolean occupancy map for a fixed-size room.
///
/// The model has no notion of item identity: callers decide which regions to
/// mark, and may pass a tolerated region when validating a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    width: u32,
    height: u32,
    occupancy: Vec<bool>,
}

impl GridModel {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            occupancy: vec![false; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `cell` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    /// Occupancy of `cell`; out-of-bounds cells report `false`.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.index_of(cell)
            .map(|idx| self.occupancy[idx])
            .unwrap_or(false)
    }

    /// True when every cell of the region is in bounds and unoccupied.
    pub fn is_region_legal(&self, origin: Cell, size: Footprint) -> bool {
        self.check_region(Region::new(origin, size), None)
    }

    /// Like [`is_region_legal`](Self::is_region_legal), but occupied cells that
    /// fall inside `tolerated` do not count against the region.
    pub fn is_region_legal_except(&self, origin: Cell, size: Footprint, tolerated: &Region) -> bool {
        self.check_region(Region::new(origin, size), Some(tolerated))
    }

    fn check_region(&self, region: Region, tolerated: Option<&Region>) -> bool {
        if region.footprint.is_empty() {
            return false;
        }
        for cell in region.cells() {
            let Some(idx) = cell.and_then(|c| self.index_of(c)) else {
                return false;
            };
            if !self.occupancy[idx] {
                continue;
            }
            let own = match (cell, tolerated) {
                (Some(c), Some(t)) => t.contains(c),
                _ => false,
            };
            if !own {
                return false;
            }
        }
        true
    }

    /// Mark or clear every in-bounds cell of the region. Out-of-bounds cells
    /// are skipped.
    pub fn set_occupancy(&mut self, origin: Cell, size: Footprint, occupied: bool) {
        let region = Region::new(origin, size);
        for cell in region.cells().flatten() {
            if let Some(idx) = self.index_of(cell) {
                self.occupancy[idx] = occupied;
            }
        }
    }

    pub fn reset(&mut self) {
        self.occupancy.iter_mut().for_each(|cell| *cell = false);
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|occupied| **occupied).count()
    }

    /// Occupied cells in row-major order.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        self.occupancy
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(idx, _)| {
                let w = self.width as usize;
                Cell::new((idx % w) as i32, (idx / w) as i32)
            })
            .collect()
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let x = u32::try_from(cell.x).ok()?;
        let y = u32::try_from(cell.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}
