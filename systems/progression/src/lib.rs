#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Experience curve, level-ups and experience rewards.

use std::collections::BTreeSet;

use resort_tycoon_core::{
    BuildingId, CatalogItem, ExperienceRewards, ProgressionCurve, ProgressionState,
};
use serde::{Deserialize, Serialize};

/// Result of awarding experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpOutcome {
    /// Progression after the award.
    pub next: ProgressionState,
    /// Whether at least one level was gained.
    pub leveled_up: bool,
    /// Number of levels gained.
    pub levels_gained: u32,
}

/// Adds experience to the state, carrying overflow across as many levels as it covers.
#[must_use]
pub fn apply_xp(state: ProgressionState, amount: u64, curve: &ProgressionCurve) -> XpOutcome {
    let mut next = ProgressionState {
        xp_to_next: state.xp_to_next.max(1),
        ..state
    };
    next.xp = next.xp.saturating_add(amount);

    let mut levels_gained = 0u32;
    while next.xp >= next.xp_to_next {
        next.xp -= next.xp_to_next;
        next.level = next.level.saturating_add(1);
        next.xp_to_next = next_requirement(next.xp_to_next, curve);
        levels_gained = levels_gained.saturating_add(1);
    }

    XpOutcome {
        next,
        leveled_up: levels_gained > 0,
        levels_gained,
    }
}

/// Experience required for the level after one that needed `previous`.
#[must_use]
pub fn next_requirement(previous: u64, curve: &ProgressionCurve) -> u64 {
    let scaled = (previous as f64 * curve.growth_factor + curve.growth_bonus).round();
    // Never shrink, so the level loop always terminates.
    (scaled as u64).max(previous).max(1)
}

/// Experience granted for placing the provided item.
#[must_use]
pub fn placement_reward(item: &CatalogItem, rewards: &ExperienceRewards) -> u64 {
    (rewards.building_base * item.tier).round().max(0.0) as u64
}

/// Remembers which villas already paid out their first-earning bonus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstEarningLedger {
    seen: BTreeSet<BuildingId>,
}

impl FirstEarningLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the building, returning `true` only the first time it is seen.
    pub fn record(&mut self, building: BuildingId) -> bool {
        self.seen.insert(building)
    }

    /// Reports whether the building already earned its bonus.
    #[must_use]
    pub fn contains(&self, building: BuildingId) -> bool {
        self.seen.contains(&building)
    }

    /// Forgets every recorded building.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
