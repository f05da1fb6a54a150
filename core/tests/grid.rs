use proptest::prelude::*;
use resort_tycoon_core::{CellCoord, CellRect, Footprint, GridMapper};

fn cell() -> impl Strategy<Value = CellCoord> {
    (-64i32..=64, -64i32..=64).prop_map(|(gx, gz)| CellCoord::new(gx, gz))
}

proptest! {
    #[test]
    fn cell_centres_map_back_to_their_cell(cell in cell(), size in 1u32..16) {
        let mapper = GridMapper::new(size as f32);
        prop_assert_eq!(mapper.world_to_grid(mapper.grid_to_world(cell)), cell);
    }

    #[test]
    fn regions_cover_exactly_their_footprint(anchor in cell(), width in 1u32..5, depth in 1u32..5) {
        let region = CellRect::from_anchor_and_footprint(anchor, Footprint::new(width, depth));
        let cells: Vec<CellCoord> = region.cells().collect();
        prop_assert_eq!(cells.len(), (width * depth) as usize);
        prop_assert!(cells.iter().all(|cell| region.contains(*cell)));
        prop_assert!(cells.contains(&anchor));
        prop_assert!(!region.contains(anchor.offset(-1, 0)));
    }
}
