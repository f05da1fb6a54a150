//! Placement validation shared by purchases, moves and scenery.

use resort_tycoon_core::{BuildingId, BuildingKind, CatalogItem, CellRect, Island, PlacementError};

use crate::{buildings::BuildingRegistry, occupancy::OccupancyMap};

/// Minimum Chebyshev gap between two palm anchors, exclusive.
const PALM_SPACING: u32 = 1;

/// Terrain and neighbourhood a placement is checked against.
pub(crate) struct SiteContext<'a> {
    pub(crate) island: &'a Island,
    pub(crate) occupancy: &'a OccupancyMap,
    pub(crate) buildings: &'a BuildingRegistry,
}

impl SiteContext<'_> {
    /// Checks bounds, terrain, overlap and spacing in that order.
    ///
    /// `ignore` names a building whose own cells and anchor do not count,
    /// which lets a move land on cells it currently covers.
    pub(crate) fn validate(
        &self,
        item: &CatalogItem,
        region: CellRect,
        ignore: Option<BuildingId>,
    ) -> Result<(), PlacementError> {
        if !region.cells().all(|cell| self.island.in_bounds(cell)) {
            return Err(PlacementError::OutOfBounds);
        }
        if !region
            .cells()
            .all(|cell| self.island.allows(item.site, cell))
        {
            return Err(PlacementError::Unbuildable);
        }
        if self.occupancy.overlaps(region, ignore) {
            return Err(PlacementError::TileOccupied);
        }
        if item.kind == BuildingKind::Palm && self.crowds_palm(region, ignore) {
            return Err(PlacementError::SpacingViolation);
        }
        Ok(())
    }

    fn crowds_palm(&self, region: CellRect, ignore: Option<BuildingId>) -> bool {
        let anchor = region.anchor();
        self.buildings.iter().any(|building| {
            building.kind == BuildingKind::Palm
                && Some(building.id) != ignore
                && building.region.anchor().chebyshev_distance(anchor) <= PALM_SPACING
        })
    }
}

/// Checks the level gate, then affordability.
pub(crate) fn validate_purchase(
    item: &CatalogItem,
    level: u32,
    balance: f64,
) -> Result<(), PlacementError> {
    if item.unlock_level > level {
        return Err(PlacementError::LevelLocked {
            required: item.unlock_level,
        });
    }
    if balance < f64::from(item.cost) {
        return Err(PlacementError::InsufficientFunds { cost: item.cost });
    }
    Ok(())
}
