use std::collections::BTreeSet;

use proptest::prelude::*;
use resort_tycoon_core::{
    BuildingId, BuildingKind, BuildingSnapshot, Catalog, CellCoord, CellRect, Command, Event,
    TimerKind,
};
use resort_tycoon_system_economy::EconomyStatus;
use resort_tycoon_system_guests::{find_path, GuestRouter, RoutingView};

fn snapshot(catalog: &Catalog, id: u64, kind: BuildingKind, gx: i32, gz: i32) -> BuildingSnapshot {
    let footprint = catalog.get(kind).expect("catalog item").footprint;
    BuildingSnapshot {
        id: BuildingId::new(id),
        kind,
        region: CellRect::from_anchor_and_footprint(CellCoord::new(gx, gz), footprint),
    }
}

fn villa_status(building: &BuildingSnapshot, active: bool) -> EconomyStatus {
    EconomyStatus {
        building: building.id,
        kind: building.kind,
        anchor: building.anchor(),
        active,
        road_ok: true,
        power_ok: active,
        income_per_sec: if active { 3 } else { 0 },
    }
}

struct Resort {
    catalog: Catalog,
    buildings: Vec<BuildingSnapshot>,
    statuses: Vec<EconomyStatus>,
    roads: BTreeSet<CellCoord>,
}

impl Resort {
    fn connected(active: bool) -> Self {
        let catalog = Catalog::standard();
        let mut buildings = vec![
            snapshot(&catalog, 0, BuildingKind::Villa, 0, 0),
            snapshot(&catalog, 1, BuildingKind::Pool, 4, 0),
        ];
        let mut roads = BTreeSet::new();
        for gx in 0..=4 {
            let id = 2 + gx as u64;
            buildings.push(snapshot(&catalog, id, BuildingKind::Road, gx, -1));
            let _ = roads.insert(CellCoord::new(gx, -1));
        }
        let statuses = vec![villa_status(&buildings[0], active)];
        Self {
            catalog,
            buildings,
            statuses,
            roads,
        }
    }

    fn view(&self, economy_total: i64, active_guests: u32) -> RoutingView<'_> {
        RoutingView {
            economy_total,
            active_guests,
            max_guests: 12,
            buildings: &self.buildings,
            statuses: &self.statuses,
            catalog: &self.catalog,
            roads: &self.roads,
        }
    }
}

fn spawn_tick() -> Vec<Event> {
    vec![Event::TimerElapsed {
        timer: TimerKind::GuestSpawn,
    }]
}

#[test]
fn router_spawns_guest_along_connecting_road() {
    let resort = Resort::connected(true);
    let mut router = GuestRouter::new(7);
    let mut commands = Vec::new();

    router.handle(&spawn_tick(), resort.view(5, 0), &mut commands);

    assert_eq!(commands.len(), 1);
    match &commands[0] {
        Command::SpawnGuest {
            origin,
            destination,
            path,
        } => {
            assert_eq!(*origin, BuildingId::new(0));
            assert_eq!(*destination, BuildingId::new(1));
            assert_eq!(path.first(), Some(&CellCoord::new(0, -1)));
            assert_eq!(path.last(), Some(&CellCoord::new(4, -1)));
            assert_eq!(path.len(), 5);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn router_ignores_other_timers() {
    let resort = Resort::connected(true);
    let mut router = GuestRouter::new(7);
    let mut commands = Vec::new();

    router.handle(
        &[Event::TimerElapsed {
            timer: TimerKind::Income,
        }],
        resort.view(5, 0),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn router_requires_profit_capacity_and_earning_villas() {
    let mut router = GuestRouter::new(7);

    let resort = Resort::connected(true);
    assert!(router.select(resort.view(0, 0)).is_none(), "no profit");
    assert!(router.select(resort.view(5, 12)).is_none(), "population cap");

    let idle = Resort::connected(false);
    assert!(router.select(idle.view(5, 0)).is_none(), "villa not earning");
}

#[test]
fn router_gives_up_when_roads_are_disconnected() {
    let mut resort = Resort::connected(true);
    let _ = resort.roads.remove(&CellCoord::new(2, -1));
    let mut router = GuestRouter::new(7);

    assert!(router.select(resort.view(5, 0)).is_none());
}

#[test]
fn same_seed_repeats_choices() {
    let catalog = Catalog::standard();
    let mut buildings = vec![
        snapshot(&catalog, 0, BuildingKind::Villa, 0, 0),
        snapshot(&catalog, 1, BuildingKind::Villa, 0, 3),
        snapshot(&catalog, 2, BuildingKind::Pool, 4, 0),
        snapshot(&catalog, 3, BuildingKind::Palm, 4, 3),
    ];
    let mut roads = BTreeSet::new();
    for gz in -1..=5 {
        let cell = CellCoord::new(-1, gz);
        let _ = roads.insert(cell);
        buildings.push(snapshot(&catalog, 10 + roads.len() as u64, BuildingKind::Road, -1, gz));
    }
    for gx in 0..=4 {
        let _ = roads.insert(CellCoord::new(gx, -1));
        let _ = roads.insert(CellCoord::new(gx, 2));
    }
    let statuses = vec![
        villa_status(&buildings[0], true),
        villa_status(&buildings[1], true),
    ];
    let view = RoutingView {
        economy_total: 10,
        active_guests: 0,
        max_guests: 12,
        buildings: &buildings,
        statuses: &statuses,
        catalog: &catalog,
        roads: &roads,
    };

    let run = |seed| {
        let mut router = GuestRouter::new(seed);
        (0..8).map(|_| router.select(view)).collect::<Vec<_>>()
    };
    assert_eq!(run(11), run(11));
    assert!(run(11).iter().all(Option::is_some));
}

fn bellman_distance(
    start: CellCoord,
    goal: CellCoord,
    roads: &BTreeSet<CellCoord>,
) -> Option<usize> {
    let mut distances = std::collections::BTreeMap::new();
    let _ = distances.insert(start, 0usize);
    for _ in 0..=roads.len() {
        for cell in roads {
            let best = cell
                .neighbors4()
                .iter()
                .filter_map(|neighbor| distances.get(neighbor))
                .min()
                .map(|distance| distance + 1);
            if let Some(candidate) = best {
                let entry = distances.entry(*cell).or_insert(usize::MAX);
                if candidate < *entry {
                    *entry = candidate;
                }
            }
        }
    }
    distances.get(&goal).copied()
}

proptest! {
    #[test]
    fn bfs_paths_are_contiguous_and_minimal(
        cells in proptest::collection::btree_set((0i32..6, 0i32..6), 1..30),
        goal_index in 0usize..30,
    ) {
        let roads: BTreeSet<CellCoord> = cells
            .iter()
            .map(|(gx, gz)| CellCoord::new(*gx, *gz))
            .collect();
        let ordered: Vec<CellCoord> = roads.iter().copied().collect();
        let start = ordered[0];
        let goal = ordered[goal_index % ordered.len()];

        let expected = bellman_distance(start, goal, &roads);
        match find_path(start, goal, &roads) {
            Some(path) => {
                prop_assert_eq!(path.first().copied(), Some(start));
                prop_assert_eq!(path.last().copied(), Some(goal));
                for pair in path.windows(2) {
                    prop_assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
                    prop_assert!(roads.contains(&pair[1]));
                }
                prop_assert_eq!(Some(path.len() - 1), expected);
            }
            None => prop_assert_eq!(expected, None),
        }
    }
}
