#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure economy engine deriving income, expenses, happiness and guests.
//!
//! Every function here is a pure computation over a snapshot of placed
//! buildings and the catalog. The world calls [`EconomyEngine::evaluate`]
//! after each mutation and caches the resulting [`EconomyOverview`].

use std::collections::HashSet;

use resort_tycoon_core::{
    BuildingId, BuildingKind, BuildingSnapshot, Catalog, CatalogItem, Category, CellCoord,
    EconomyTuning, HappinessTuning,
};
use serde::{Deserialize, Serialize};

/// Earning status of a single income-bearing building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyStatus {
    /// Building the status describes.
    pub building: BuildingId,
    /// Kind of the building.
    pub kind: BuildingKind,
    /// Anchor of the building.
    pub anchor: CellCoord,
    /// Whether the building currently earns.
    pub active: bool,
    /// Whether a road touches one of the anchor's neighbours.
    pub road_ok: bool,
    /// Whether the building has the power it needs.
    pub power_ok: bool,
    /// Effective income per second.
    pub income_per_sec: i64,
}

/// Per-second money flows derived from the buildings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyReport {
    /// Income minus capped upkeep.
    pub total: i64,
    /// Gross income from active buildings.
    pub income: i64,
    /// Capped upkeep plus the rounded loan payment.
    pub expenses: i64,
    /// Upkeep after applying the income cap.
    pub upkeep: i64,
    /// One status per income-bearing building, in building order.
    pub statuses: Vec<EconomyStatus>,
}

/// Report plus the happiness and guest figures it was computed from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyOverview {
    /// Money flows.
    pub report: EconomyReport,
    /// Happiness score between 0 and 100.
    pub happiness: u32,
    /// Guest count.
    pub guests: u32,
}

/// Shop stat card for a catalog item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Base income per second.
    pub income_per_sec: f64,
    /// Upkeep the item adds per second before level scaling.
    pub upkeep_per_sec: f64,
    /// Happiness the item adds, negative for nuisances.
    pub happiness_impact: f64,
    /// Guests the item attracts.
    pub guests: u32,
    /// Coverage radius for generators.
    pub power_radius: Option<u32>,
}

/// Inputs to [`EconomyEngine::compute`].
#[derive(Clone, Copy, Debug)]
pub struct EconomyInputs<'a> {
    /// Placed buildings in placement order.
    pub buildings: &'a [BuildingSnapshot],
    /// Catalog the buildings were placed from.
    pub catalog: &'a Catalog,
    /// Current guest count.
    pub guests: u32,
    /// Current player level.
    pub level: u32,
    /// Current happiness score.
    pub happiness: u32,
    /// Loan payment debited every second.
    pub loan_payment_per_sec: f64,
}

/// Inputs to [`EconomyEngine::evaluate`].
#[derive(Clone, Copy, Debug)]
pub struct ResortSnapshot<'a> {
    /// Placed buildings in placement order.
    pub buildings: &'a [BuildingSnapshot],
    /// Catalog the buildings were placed from.
    pub catalog: &'a Catalog,
    /// Current player level.
    pub level: u32,
    /// Current balance.
    pub balance: f64,
    /// Loan payment debited every second, zero without a loan.
    pub loan_payment_per_sec: f64,
    /// Whether a loan is outstanding.
    pub has_loan: bool,
}

/// Economy engine parameterised by its balance tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EconomyEngine {
    economy: EconomyTuning,
    happiness: HappinessTuning,
}

impl EconomyEngine {
    /// Creates an engine using the provided tuning.
    #[must_use]
    pub fn new(economy: EconomyTuning, happiness: HappinessTuning) -> Self {
        Self { economy, happiness }
    }

    /// Derives guests, then happiness, then the economy report.
    #[must_use]
    pub fn evaluate(&self, snapshot: ResortSnapshot<'_>) -> EconomyOverview {
        let guests = guest_count(snapshot.buildings, snapshot.catalog);
        let happiness = self.happiness(
            snapshot.buildings,
            snapshot.catalog,
            snapshot.balance,
            snapshot.has_loan,
        );
        let report = self.compute(EconomyInputs {
            buildings: snapshot.buildings,
            catalog: snapshot.catalog,
            guests,
            level: snapshot.level,
            happiness,
            loan_payment_per_sec: snapshot.loan_payment_per_sec,
        });
        EconomyOverview {
            report,
            happiness,
            guests,
        }
    }

    /// Computes income, upkeep and per-building statuses.
    #[must_use]
    pub fn compute(&self, inputs: EconomyInputs<'_>) -> EconomyReport {
        let tuning = &self.economy;
        let generators = generator_sites(inputs.buildings, inputs.catalog);
        let roads = road_cells(inputs.buildings);
        let multiplier =
            (1.0 + f64::from(inputs.happiness) / 100.0 * tuning.happiness_income_boost).max(1.0);

        let mut statuses = Vec::new();
        let mut income: i64 = 0;
        let mut counts = ExpenseCounts::default();

        for building in inputs.buildings {
            let Some(item) = inputs.catalog.get(building.kind) else {
                continue;
            };
            counts.record(item);

            if !item.is_income_bearing() {
                continue;
            }
            let anchor = building.anchor();
            let road_ok = anchor
                .neighbors4()
                .iter()
                .any(|neighbor| roads.contains(neighbor));
            let power_ok = !item.power.requires_power() || is_powered(anchor, &generators);
            let active = power_ok;
            let income_per_sec = if active {
                round(item.income_per_sec * multiplier)
            } else {
                0
            };
            income = income.saturating_add(income_per_sec);
            statuses.push(EconomyStatus {
                building: building.id,
                kind: building.kind,
                anchor,
                active,
                road_ok,
                power_ok,
                income_per_sec,
            });
        }

        let level_scale = 1.0 + f64::from(inputs.level) * tuning.level_scaling;
        let raw = (tuning.base_maintenance
            + counts.buildings as f64 * tuning.per_building
            + counts.generators as f64 * tuning.per_generator
            + f64::from(inputs.guests) * tuning.per_guest
            + counts.beach_djs as f64 * tuning.per_beach_dj
            + counts.utilities as f64 * tuning.per_utility
            + counts.spas as f64 * tuning.per_spa
            + counts.beach_clubs as f64 * tuning.per_beach_club)
            * level_scale;
        let raw_expenses = round(raw).max(0);
        let upkeep = if income > 0 {
            raw_expenses.min(round(income as f64 * tuning.upkeep_cap_ratio))
        } else {
            0
        };
        let expenses = upkeep.saturating_add(round(inputs.loan_payment_per_sec));

        EconomyReport {
            total: income - upkeep,
            income,
            expenses,
            upkeep,
            statuses,
        }
    }

    /// Scores resort happiness between 0 and 100.
    #[must_use]
    pub fn happiness(
        &self,
        buildings: &[BuildingSnapshot],
        catalog: &Catalog,
        balance: f64,
        has_loan: bool,
    ) -> u32 {
        let tuning = &self.happiness;
        let mut attractions = 0u32;
        let mut roads = 0u32;
        let mut palms = 0u32;
        let mut decor = 0u32;
        let mut generators = 0u32;
        let mut utilities = 0u32;
        let mut non_road = 0u32;

        for building in buildings {
            let Some(item) = catalog.get(building.kind) else {
                continue;
            };
            match item.category {
                Category::Attraction => attractions += 1,
                Category::Decor => decor += 1,
                Category::Utility => utilities += 1,
                Category::Stay | Category::Food => {}
            }
            if item.kind.is_road() {
                roads += 1;
            } else {
                non_road += 1;
            }
            if item.kind == BuildingKind::Palm {
                palms += 1;
            }
            if item.power.generator_radius().is_some() {
                generators += 1;
            }
        }

        let mut score = tuning.base;
        score += f64::from(attractions) * tuning.per_attraction;
        score += (f64::from(roads) * tuning.per_road).min(tuning.road_cap);
        score += (f64::from(palms) * tuning.per_palm).min(tuning.palm_cap);
        score += (f64::from(decor) * tuning.per_decor).min(tuning.decor_cap);
        score -= f64::from(generators) * tuning.per_generator;
        if non_road > tuning.crowding_threshold {
            let excess = f64::from(non_road - tuning.crowding_threshold);
            score -= (excess * tuning.per_crowded_building).min(tuning.crowding_cap);
        }
        if attractions == 0 {
            score -= tuning.no_attraction_penalty;
        }
        if roads == 0 {
            score -= tuning.no_road_penalty;
        }
        if utilities == 0 {
            score -= tuning.no_utility_penalty;
        }
        if balance < 0.0 {
            score -= tuning.negative_balance_penalty;
        }
        if has_loan {
            score -= tuning.loan_penalty;
        }

        round(score).clamp(0, 100) as u32
    }

    /// Derives the shop stat card for a catalog item.
    #[must_use]
    pub fn item_stats(&self, item: &CatalogItem) -> ItemStats {
        let happiness = &self.happiness;
        let economy = &self.economy;

        let mut happiness_impact = 0.0;
        if item.kind.is_road() {
            happiness_impact += happiness.per_road;
        }
        if item.kind == BuildingKind::Palm {
            happiness_impact += happiness.per_palm;
        }
        if item.category == Category::Decor {
            happiness_impact += happiness.per_decor;
        }
        if item.category == Category::Attraction {
            happiness_impact += happiness.per_attraction;
        }
        if item.power.generator_radius().is_some() {
            happiness_impact -= happiness.per_generator;
        }

        let mut upkeep_per_sec = economy.per_building;
        upkeep_per_sec += match item.kind {
            BuildingKind::BeachDj => economy.per_beach_dj,
            BuildingKind::Spa => economy.per_spa,
            BuildingKind::BeachClub => economy.per_beach_club,
            _ => 0.0,
        };
        if item.power.generator_radius().is_some() {
            upkeep_per_sec += economy.per_generator;
        } else if item.category == Category::Utility {
            upkeep_per_sec += economy.per_utility;
        }

        ItemStats {
            income_per_sec: item.income_per_sec,
            upkeep_per_sec,
            happiness_impact,
            guests: item.guest_weight,
            power_radius: item.power.generator_radius(),
        }
    }
}

/// Sums the fixed guest contribution of every building.
#[must_use]
pub fn guest_count(buildings: &[BuildingSnapshot], catalog: &Catalog) -> u32 {
    buildings
        .iter()
        .filter_map(|building| catalog.get(building.kind))
        .map(|item| item.guest_weight)
        .fold(0u32, u32::saturating_add)
}

/// Reports whether any generator covers the provided anchor.
///
/// Each generator is given as its anchor and coverage radius; coverage is
/// the Euclidean distance between anchors in cell units.
#[must_use]
pub fn is_powered(anchor: CellCoord, generators: &[(CellCoord, u32)]) -> bool {
    generators
        .iter()
        .any(|(site, radius)| site.euclidean_distance(anchor) <= f64::from(*radius))
}

/// Anchors and radii of every generator among the buildings.
#[must_use]
pub fn generator_sites(buildings: &[BuildingSnapshot], catalog: &Catalog) -> Vec<(CellCoord, u32)> {
    buildings
        .iter()
        .filter_map(|building| {
            let radius = catalog.get(building.kind)?.power.generator_radius()?;
            Some((building.anchor(), radius))
        })
        .collect()
}

fn road_cells(buildings: &[BuildingSnapshot]) -> HashSet<CellCoord> {
    buildings
        .iter()
        .filter(|building| building.kind.is_road())
        .flat_map(|building| building.region.cells())
        .collect()
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

#[derive(Default)]
struct ExpenseCounts {
    buildings: u32,
    generators: u32,
    beach_djs: u32,
    utilities: u32,
    spas: u32,
    beach_clubs: u32,
}

impl ExpenseCounts {
    fn record(&mut self, item: &CatalogItem) {
        self.buildings += 1;
        if item.power.generator_radius().is_some() {
            self.generators += 1;
        } else if item.category == Category::Utility {
            self.utilities += 1;
        }
        match item.kind {
            BuildingKind::BeachDj => self.beach_djs += 1,
            BuildingKind::Spa => self.spas += 1,
            BuildingKind::BeachClub => self.beach_clubs += 1,
            _ => {}
        }
    }
}
