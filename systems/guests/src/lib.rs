#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Guest routing across the road network.
//!
//! The router reacts to guest-spawn timer events by picking an earning villa
//! and a destination that are both reachable over roads, then emits a
//! [`Command::SpawnGuest`] carrying the outbound path. Path searches run from
//! scratch every time because roads change between calls.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use resort_tycoon_core::{
    BuildingSnapshot, Catalog, CatalogItem, CellCoord, Command, Event, TimerKind,
};
use resort_tycoon_system_economy::EconomyStatus;

/// First road cell among the anchor's axis-aligned neighbours.
#[must_use]
pub fn find_road_anchor(anchor: CellCoord, roads: &BTreeSet<CellCoord>) -> Option<CellCoord> {
    anchor
        .neighbors4()
        .into_iter()
        .find(|neighbor| roads.contains(neighbor))
}

/// Shortest 4-connected path over road cells, including both endpoints.
///
/// Returns `Some(vec![start])` when `start == goal` and `None` when the goal
/// cannot be reached.
#[must_use]
pub fn find_path(
    start: CellCoord,
    goal: CellCoord,
    roads: &BTreeSet<CellCoord>,
) -> Option<Vec<CellCoord>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut came_from: BTreeMap<CellCoord, Option<CellCoord>> = BTreeMap::new();
    let mut queue = VecDeque::new();
    let _ = came_from.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for neighbor in current.neighbors4() {
            if !roads.contains(&neighbor) || came_from.contains_key(&neighbor) {
                continue;
            }
            let _ = came_from.insert(neighbor, Some(current));
            queue.push_back(neighbor);
        }
    }

    if !came_from.contains_key(&goal) {
        return None;
    }

    let mut path = Vec::new();
    let mut step = Some(goal);
    while let Some(cell) = step {
        path.push(cell);
        step = came_from.get(&cell).copied().flatten();
    }
    path.reverse();
    Some(path)
}

/// Read-only state the router selects spawns from.
#[derive(Clone, Copy, Debug)]
pub struct RoutingView<'a> {
    /// Net income per second.
    pub economy_total: i64,
    /// Guests currently walking.
    pub active_guests: u32,
    /// Maximum number of walking guests.
    pub max_guests: u32,
    /// Placed buildings in placement order.
    pub buildings: &'a [BuildingSnapshot],
    /// Earning statuses of income-bearing buildings.
    pub statuses: &'a [EconomyStatus],
    /// Catalog the buildings were placed from.
    pub catalog: &'a Catalog,
    /// Cells covered by roads.
    pub roads: &'a BTreeSet<CellCoord>,
}

/// Seeded guest spawn selector.
#[derive(Clone, Debug)]
pub struct GuestRouter {
    rng: ChaCha8Rng,
}

impl GuestRouter {
    /// Creates a router whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits one spawn request per guest-spawn timer event when a route exists.
    pub fn handle(&mut self, events: &[Event], view: RoutingView<'_>, out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimerElapsed {
                timer: TimerKind::GuestSpawn,
            } = event
            {
                if let Some(command) = self.select(view) {
                    out.push(command);
                }
            }
        }
    }

    /// Picks a reachable villa and destination pair in seeded random order.
    pub fn select(&mut self, view: RoutingView<'_>) -> Option<Command> {
        if view.economy_total <= 0 || view.active_guests >= view.max_guests {
            return None;
        }

        let villas: Vec<&EconomyStatus> = view
            .statuses
            .iter()
            .filter(|status| status.kind.is_villa() && status.active)
            .collect();
        let destinations: Vec<&BuildingSnapshot> = view
            .buildings
            .iter()
            .filter(|building| {
                view.catalog
                    .get(building.kind)
                    .is_some_and(CatalogItem::is_guest_destination)
            })
            .collect();
        if villas.is_empty() || destinations.is_empty() || view.roads.is_empty() {
            return None;
        }

        let mut pairs: Vec<(usize, usize)> = (0..villas.len())
            .flat_map(|villa| (0..destinations.len()).map(move |target| (villa, target)))
            .collect();
        pairs.shuffle(&mut self.rng);

        for (villa, target) in pairs {
            let origin = villas[villa];
            let destination = destinations[target];
            let Some(start) = find_road_anchor(origin.anchor, view.roads) else {
                continue;
            };
            let Some(goal) = find_road_anchor(destination.anchor(), view.roads) else {
                continue;
            };
            if let Some(path) = find_path(start, goal, view.roads) {
                return Some(Command::SpawnGuest {
                    origin: origin.building,
                    destination: destination.id,
                    path,
                });
            }
        }

        debug!(
            "no road route between {} villas and {} destinations",
            villas.len(),
            destinations.len()
        );
        None
    }
}
