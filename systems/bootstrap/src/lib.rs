#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a fresh resort: the greeting, the
//! seeded shoreline scenery and the onboarding checklist.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use resort_tycoon_core::{BuildingKind, CellCoord, Command};
use resort_tycoon_world::{query, World};

/// Message shown once every tutorial step is done.
pub const TUTORIAL_COMPLETE: &str =
    "Nice. Now expand. Guests are picky and your electricity is probably illegal.";

const STEP_MESSAGES: [&str; 3] = [
    "Your Reception is open. Guests will start arriving.",
    "Build a Villa (the money-maker).",
    "Build a Generator within 6 tiles of the Villa.",
];

/// Onboarding checklist derived from the current world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TutorialProgress {
    /// Completion flag per step, in tutorial order.
    pub completed: Vec<bool>,
    /// Index of the first unfinished step, if any.
    pub current: Option<usize>,
    /// Whether every step is done.
    pub all_done: bool,
    /// Prompt for the current step, or the completion message.
    pub message: &'static str,
}

/// Produces data required to greet the player and dress the island.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Picks shoreline palm anchors from a seeded shuffle of the shore ring.
    ///
    /// Anchors already failing site validation are dropped up front and the
    /// chosen set keeps palms out of each other's neighbourhood, so the world
    /// places every anchor unless the island changes in between.
    #[must_use]
    pub fn scenery_command(&self, world: &World, seed: u64) -> Command {
        let count = query::config(world).scenery.palm_count as usize;
        let mut candidates = query::island(world).shore_cells();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        candidates.shuffle(&mut rng);

        let mut anchors: Vec<CellCoord> = Vec::with_capacity(count);
        for cell in candidates {
            if anchors.len() >= count {
                break;
            }
            if query::validate_site(world, BuildingKind::Palm, cell).is_err() {
                continue;
            }
            if anchors
                .iter()
                .any(|chosen| chosen.chebyshev_distance(cell) <= 1)
            {
                continue;
            }
            anchors.push(cell);
        }

        Command::PlaceScenery {
            kind: BuildingKind::Palm,
            anchors,
        }
    }

    /// Evaluates the onboarding checklist.
    #[must_use]
    pub fn tutorial(&self, world: &World) -> TutorialProgress {
        let buildings = query::buildings(world);
        let has_reception = buildings
            .iter()
            .any(|building| building.kind == BuildingKind::Reception);
        let villa = buildings
            .iter()
            .find(|building| building.kind == BuildingKind::Villa)
            .map(|building| building.anchor());
        let radius = query::catalog(world)
            .get(BuildingKind::Generator)
            .and_then(|item| item.power.generator_radius())
            .unwrap_or(0);
        let powered = villa.is_some_and(|villa| {
            buildings.iter().any(|building| {
                building.kind == BuildingKind::Generator
                    && building.anchor().euclidean_distance(villa) <= f64::from(radius)
            })
        });

        let completed = vec![has_reception, villa.is_some(), powered];
        let current = completed.iter().position(|done| !done);
        TutorialProgress {
            all_done: current.is_none(),
            message: current.map_or(TUTORIAL_COMPLETE, |step| STEP_MESSAGES[step]),
            current,
            completed,
        }
    }
}
