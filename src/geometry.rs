use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid coordinate. Signed so off-grid targets can be expressed and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unrotated item size measured in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub cols: u32,
    pub rows: u32,
}

impl Footprint {
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Rectangle of cells anchored at `origin` and extending right/up by `footprint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub origin: Cell,
    pub footprint: Footprint,
}

impl Region {
    pub const fn new(origin: Cell, footprint: Footprint) -> Self {
        Self { origin, footprint }
    }

    // Edges are computed in i64 so large footprints near i32::MAX cannot wrap.
    fn right(&self) -> i64 {
        i64::from(self.origin.x) + i64::from(self.footprint.cols)
    }

    fn top(&self) -> i64 {
        i64::from(self.origin.y) + i64::from(self.footprint.rows)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let (x, y) = (i64::from(cell.x), i64::from(cell.y));
        x >= i64::from(self.origin.x)
            && x < self.right()
            && y >= i64::from(self.origin.y)
            && y < self.top()
    }

    pub fn intersects(&self, other: &Region) -> bool {
        if self.footprint.is_empty() || other.footprint.is_empty() {
            return false;
        }
        i64::from(self.origin.x) < other.right()
            && i64::from(other.origin.x) < self.right()
            && i64::from(self.origin.y) < other.top()
            && i64::from(other.origin.y) < self.top()
    }

    /// Every coordinate covered by the region, column-major. Coordinates that
    /// would leave the `i32` range are yielded as `None` so callers can treat
    /// them as out of bounds.
    pub fn cells(&self) -> impl Iterator<Item = Option<Cell>> + '_ {
        let x0 = i64::from(self.origin.x);
        let y0 = i64::from(self.origin.y);
        (0..i64::from(self.footprint.cols)).flat_map(move |dx| {
            (0..i64::from(self.footprint.rows)).map(move |dy| {
                let x = i32::try_from(x0 + dx).ok()?;
                let y = i32::try_from(y0 + dy).ok()?;
                Some(Cell::new(x, y))
            })
        })
    }
}

/// Visual rotation of a placed item. Does not affect the occupied footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Next clockwise quarter turn.
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Accepts any multiple of 90, normalizing it into `[0, 360)`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            _ => Some(Rotation::Deg270),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_cells_cover_footprint() {
        let region = Region::new(Cell::new(1, 2), Footprint::new(2, 3));
        let cells: Vec<_> = region.cells().flatten().collect();
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&Cell::new(1, 2)));
        assert!(cells.contains(&Cell::new(2, 4)));
        assert!(!cells.contains(&Cell::new(3, 2)));
    }

    #[test]
    fn region_cells_near_i32_max_do_not_wrap() {
        let region = Region::new(Cell::new(i32::MAX, 0), Footprint::new(2, 1));
        let cells: Vec<_> = region.cells().collect();
        assert_eq!(cells, vec![Some(Cell::new(i32::MAX, 0)), None]);
    }

    #[test]
    fn intersects_is_edge_exclusive() {
        let sofa = Region::new(Cell::new(0, 0), Footprint::new(3, 2));
        let touching = Region::new(Cell::new(3, 0), Footprint::new(2, 1));
        let overlapping = Region::new(Cell::new(2, 1), Footprint::new(2, 1));
        assert!(!sofa.intersects(&touching));
        assert!(sofa.intersects(&overlapping));
        assert!(overlapping.intersects(&sofa));
    }

    #[test]
    fn rotation_cycles_through_quarter_turns() {
        let mut rotation = Rotation::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            rotation = rotation.next();
            seen.push(rotation.degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn rotation_from_degrees_normalizes_multiples_of_ninety() {
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(45), None);
    }
}
