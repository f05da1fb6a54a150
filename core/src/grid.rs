//! Island grid coordinates, footprints and the world-space mapper.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Location of a single island cell expressed as signed grid coordinates.
///
/// The island is centred on the origin, so both axes extend into negative
/// values. `gz` follows the world z axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    gx: i32,
    gz: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(gx: i32, gz: i32) -> Self {
        Self { gx, gz }
    }

    /// Column index of the cell along the world x axis.
    #[must_use]
    pub const fn gx(&self) -> i32 {
        self.gx
    }

    /// Row index of the cell along the world z axis.
    #[must_use]
    pub const fn gz(&self) -> i32 {
        self.gz
    }

    /// Canonical key uniquely identifying the cell.
    #[must_use]
    pub const fn key(self) -> CellKey {
        CellKey(((self.gx as u32 as u64) << 32) | (self.gz as u32 as u64))
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            gx: self.gx.saturating_add(dx),
            gz: self.gz.saturating_add(dz),
        }
    }

    /// The four axis-aligned neighbours in `+x, -x, +z, -z` order.
    #[must_use]
    pub const fn neighbors4(self) -> [CellCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.gx
            .abs_diff(other.gx)
            .saturating_add(self.gz.abs_diff(other.gz))
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.gx.abs_diff(other.gx).max(self.gz.abs_diff(other.gz))
    }

    /// Computes the straight-line distance between two cells in cell units.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f64 {
        let dx = f64::from(self.gx) - f64::from(other.gx);
        let dz = f64::from(self.gz) - f64::from(other.gz);
        dx.hypot(dz)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.gx, self.gz)
    }
}

/// Canonical identifier for a cell, suitable as a set or map key.
///
/// Both coordinates are packed into a single word, so distinct cells always
/// produce distinct keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(u64);

impl CellKey {
    /// Retrieves the packed representation of the key.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Recovers the cell encoded by the key.
    #[must_use]
    pub const fn cell(self) -> CellCoord {
        CellCoord::new((self.0 >> 32) as u32 as i32, self.0 as u32 as i32)
    }
}

/// Rectangular footprint of a catalog item measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    width: u32,
    depth: u32,
}

impl Footprint {
    /// Footprint covering exactly one cell.
    pub const SINGLE: Footprint = Footprint::new(1, 1);

    /// Creates a footprint spanning `width` cells along x and `depth` along z.
    ///
    /// Zero extents are widened to one so every item covers its anchor.
    #[must_use]
    pub const fn new(width: u32, depth: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            depth: if depth == 0 { 1 } else { depth },
        }
    }

    /// Extent along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Extent along the z axis.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of cells covered by the footprint.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.width.saturating_mul(self.depth)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Axis-aligned rectangle of cells anchored at its minimum corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    anchor: CellCoord,
    footprint: Footprint,
}

impl CellRect {
    /// Constructs a rectangle from an anchor cell and footprint.
    #[must_use]
    pub const fn from_anchor_and_footprint(anchor: CellCoord, footprint: Footprint) -> Self {
        Self { anchor, footprint }
    }

    /// Minimum corner of the rectangle.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Enumerates every covered cell, x offsets outermost.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let anchor = self.anchor;
        let depth = self.footprint.depth();
        (0..self.footprint.width()).flat_map(move |dx| {
            (0..depth).map(move |dz| anchor.offset(dx as i32, dz as i32))
        })
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let dx = i64::from(cell.gx()) - i64::from(self.anchor.gx());
        let dz = i64::from(cell.gz()) - i64::from(self.anchor.gz());
        dx >= 0
            && dz >= 0
            && dx < i64::from(self.footprint.width())
            && dz < i64::from(self.footprint.depth())
    }
}

/// Bidirectional mapping between continuous world positions and grid cells.
///
/// World positions use `glam::Vec2` where `x` is world x and `y` is world z.
/// A cell maps to its centre, and positions round to the nearest centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMapper {
    cell_size: f32,
}

impl GridMapper {
    /// Creates a mapper for cells of the given edge length in world units.
    ///
    /// Non-positive or non-finite sizes fall back to one world unit.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self { cell_size }
    }

    /// Edge length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Maps a world position onto the cell whose centre is nearest.
    #[must_use]
    pub fn world_to_grid(&self, position: Vec2) -> CellCoord {
        CellCoord::new(
            (position.x / self.cell_size).round() as i32,
            (position.y / self.cell_size).round() as i32,
        )
    }

    /// Maps a cell onto the world position of its centre.
    #[must_use]
    pub fn grid_to_world(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.gx() as f32 * self.cell_size,
            cell.gz() as f32 * self.cell_size,
        )
    }

    /// Radial distance of the cell centre from the island origin.
    #[must_use]
    pub fn radius_of(&self, cell: CellCoord) -> f32 {
        self.grid_to_world(cell).length()
    }
}
