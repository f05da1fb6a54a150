//! Authoritative building state management utilities.

use std::collections::BTreeMap;

use resort_tycoon_core::{BuildingId, BuildingKind, BuildingSnapshot, CellCoord, CellRect};

/// Snapshot of a building stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BuildingState {
    /// Identifier allocated by the world for the building.
    pub(crate) id: BuildingId,
    /// Kind of building that was constructed.
    pub(crate) kind: BuildingKind,
    /// Region of cells occupied by the building.
    pub(crate) region: CellRect,
}

impl BuildingState {
    pub(crate) fn snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            id: self.id,
            kind: self.kind,
            region: self.region,
        }
    }
}

/// Registry that stores buildings and manages identifier allocation.
///
/// Identifiers are sequential, so iteration order matches placement order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BuildingRegistry {
    entries: BTreeMap<BuildingId, BuildingState>,
    next_building_id: BuildingId,
}

impl BuildingRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_building_id: BuildingId::new(0),
        }
    }

    /// Stores a new building and returns its identifier.
    pub(crate) fn insert(&mut self, kind: BuildingKind, region: CellRect) -> BuildingId {
        let id = self.next_building_id;
        self.next_building_id = BuildingId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, BuildingState { id, kind, region });
        id
    }

    pub(crate) fn get(&self, id: BuildingId) -> Option<&BuildingState> {
        self.entries.get(&id)
    }

    pub(crate) fn remove(&mut self, id: BuildingId) -> Option<BuildingState> {
        self.entries.remove(&id)
    }

    /// Re-anchors a building, keeping its footprint.
    pub(crate) fn relocate(&mut self, id: BuildingId, anchor: CellCoord) -> Option<CellRect> {
        let state = self.entries.get_mut(&id)?;
        let previous = state.region;
        state.region = CellRect::from_anchor_and_footprint(anchor, previous.footprint());
        Some(previous)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BuildingState> {
        self.entries.values()
    }

    pub(crate) fn snapshots(&self) -> Vec<BuildingSnapshot> {
        self.iter().map(BuildingState::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_tycoon_core::Footprint;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = BuildingRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_building_id.get(), 0);
    }

    #[test]
    fn identifiers_are_sequential_and_never_reused() {
        let mut registry = BuildingRegistry::new();
        let region = CellRect::from_anchor_and_footprint(CellCoord::new(0, 0), Footprint::SINGLE);
        let first = registry.insert(BuildingKind::Road, region);
        let second = registry.insert(BuildingKind::Road, region);
        assert!(registry.remove(first).is_some());
        let third = registry.insert(BuildingKind::Road, region);
        assert_eq!(
            (first.get(), second.get(), third.get()),
            (0, 1, 2),
            "identifiers keep increasing after removal"
        );
    }

    #[test]
    fn relocation_preserves_footprint() {
        let mut registry = BuildingRegistry::new();
        let region =
            CellRect::from_anchor_and_footprint(CellCoord::new(1, 2), Footprint::new(2, 3));
        let id = registry.insert(BuildingKind::Villa, region);

        let previous = registry.relocate(id, CellCoord::new(-4, 0));

        assert_eq!(previous, Some(region));
        let moved = registry.get(id).expect("building");
        assert_eq!(moved.region.anchor(), CellCoord::new(-4, 0));
        assert_eq!(moved.region.footprint(), Footprint::new(2, 3));
        assert_eq!(moved.kind, BuildingKind::Villa);
    }
}
