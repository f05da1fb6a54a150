//! Radial island terrain.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::SiteRule,
    config::IslandConfig,
    grid::{CellCoord, GridMapper},
};

/// Terrain band a cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Inner grass disc.
    Grass,
    /// Unbuildable beach between the grass and the shore ring.
    Sand,
    /// Buildable shore ring.
    Shore,
    /// Open water.
    Water,
}

/// Island geometry resolving cells to terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Island {
    config: IslandConfig,
    mapper: GridMapper,
}

impl Island {
    /// Builds the island described by the configuration.
    #[must_use]
    pub fn new(config: IslandConfig) -> Self {
        Self {
            config,
            mapper: GridMapper::new(config.cell_size),
        }
    }

    /// World-space mapper sharing the island's cell size.
    #[must_use]
    pub const fn mapper(&self) -> GridMapper {
        self.mapper
    }

    /// Largest absolute coordinate on either axis.
    #[must_use]
    pub const fn half_extent(&self) -> i32 {
        self.config.half_extent
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        let half = self.config.half_extent;
        (-half..=half).contains(&cell.gx()) && (-half..=half).contains(&cell.gz())
    }

    /// Terrain under the cell centre. Cells outside the grid are water.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Terrain {
        if !self.in_bounds(cell) {
            return Terrain::Water;
        }
        let radius = self.mapper.radius_of(cell);
        if radius <= self.config.grass_radius {
            Terrain::Grass
        } else if radius < self.config.shore_inner {
            Terrain::Sand
        } else if radius <= self.config.shore_outer {
            Terrain::Shore
        } else {
            Terrain::Water
        }
    }

    /// Reports whether an item with the given site rule may cover the cell.
    #[must_use]
    pub fn allows(&self, site: SiteRule, cell: CellCoord) -> bool {
        match (site, self.terrain(cell)) {
            (SiteRule::Inland, Terrain::Grass | Terrain::Shore) => true,
            (SiteRule::Shoreline, Terrain::Shore) => true,
            _ => false,
        }
    }

    /// Every in-bounds cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let half = self.config.half_extent;
        (-half..=half).flat_map(move |gz| (-half..=half).map(move |gx| CellCoord::new(gx, gz)))
    }

    /// Every shore cell in row-major order.
    #[must_use]
    pub fn shore_cells(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|cell| self.terrain(*cell) == Terrain::Shore)
            .collect()
    }
}

impl Default for Island {
    fn default() -> Self {
        Self::new(IslandConfig::default())
    }
}
