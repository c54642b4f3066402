//! World <-> grid coordinate mapping for presentation layers.
//!
//! `grid = round((world - origin) / cell_size)`, per axis.

use crate::geometry::Cell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapping {
    pub origin: (f32, f32),
    pub cell_size: f32,
}

impl Default for GridMapping {
    fn default() -> Self {
        Self::new((0.0, 0.0), 1.0)
    }
}

impl GridMapping {
    pub const fn new(origin: (f32, f32), cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// World position of the cell's anchor corner.
    pub fn grid_to_world(&self, cell: Cell) -> (f32, f32) {
        (
            self.origin.0 + cell.x as f32 * self.cell_size,
            self.origin.1 + cell.y as f32 * self.cell_size,
        )
    }

    /// Nearest cell to a world position. Halfway points round to the even
    /// neighbour; values beyond the `i32` range saturate.
    pub fn world_to_grid(&self, world: (f32, f32)) -> Cell {
        let x = ((world.0 - self.origin.0) / self.cell_size).round_ties_even();
        let y = ((world.1 - self.origin.1) / self.cell_size).round_ties_even();
        Cell::new(x as i32, y as i32)
    }
}
