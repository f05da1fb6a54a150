//! Sparse cell occupancy and the derived road network.

use std::collections::{BTreeMap, BTreeSet};

use resort_tycoon_core::{BuildingId, CellCoord, CellRect};

/// Map from every covered cell to the building covering it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct OccupancyMap {
    cells: BTreeMap<CellCoord, BuildingId>,
    roads: BTreeSet<CellCoord>,
}

impl OccupancyMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn occupy(&mut self, building: BuildingId, region: CellRect, is_road: bool) {
        for cell in region.cells() {
            let _ = self.cells.insert(cell, building);
            if is_road {
                let _ = self.roads.insert(cell);
            }
        }
    }

    pub(crate) fn vacate(&mut self, region: CellRect) {
        for cell in region.cells() {
            let _ = self.cells.remove(&cell);
            let _ = self.roads.remove(&cell);
        }
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<BuildingId> {
        self.cells.get(&cell).copied()
    }

    /// Reports whether any cell of the region is taken by a building other than `ignore`.
    pub(crate) fn overlaps(&self, region: CellRect, ignore: Option<BuildingId>) -> bool {
        region.cells().any(|cell| {
            self.occupant(cell)
                .is_some_and(|occupant| Some(occupant) != ignore)
        })
    }

    pub(crate) fn cells(&self) -> &BTreeMap<CellCoord, BuildingId> {
        &self.cells
    }

    pub(crate) fn roads(&self) -> &BTreeSet<CellCoord> {
        &self.roads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_tycoon_core::Footprint;

    fn rect(gx: i32, gz: i32, width: u32, depth: u32) -> CellRect {
        CellRect::from_anchor_and_footprint(CellCoord::new(gx, gz), Footprint::new(width, depth))
    }

    #[test]
    fn occupy_and_vacate_round_trip() {
        let mut map = OccupancyMap::new();
        let villa = BuildingId::new(0);
        map.occupy(villa, rect(0, 0, 2, 2), false);
        assert_eq!(map.cells().len(), 4);
        assert_eq!(map.occupant(CellCoord::new(1, 1)), Some(villa));

        map.vacate(rect(0, 0, 2, 2));
        assert!(map.cells().is_empty());
    }

    #[test]
    fn overlap_ignores_the_moving_building() {
        let mut map = OccupancyMap::new();
        let villa = BuildingId::new(0);
        map.occupy(villa, rect(0, 0, 2, 2), false);

        assert!(map.overlaps(rect(1, 1, 2, 2), None));
        assert!(!map.overlaps(rect(1, 1, 2, 2), Some(villa)));
        assert!(!map.overlaps(rect(2, 0, 1, 1), None));
    }

    #[test]
    fn roads_are_tracked_alongside() {
        let mut map = OccupancyMap::new();
        map.occupy(BuildingId::new(0), rect(3, 3, 1, 1), true);
        map.occupy(BuildingId::new(1), rect(0, 0, 1, 1), false);
        assert_eq!(map.roads().len(), 1);
        assert!(map.roads().contains(&CellCoord::new(3, 3)));

        map.vacate(rect(3, 3, 1, 1));
        assert!(map.roads().is_empty());
    }
}
