//! Tunable simulation parameters.
//!
//! Every section deserialises with `#[serde(default)]`, so configuration
//! files only need to list the values they override. Durations are stored
//! as whole milliseconds and exposed through [`Duration`] accessors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TimerKind;

/// Complete configuration consumed by the world and the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Island geometry and terrain bands.
    pub island: IslandConfig,
    /// Balance applied to the player's wallet on reset.
    pub starting_money: f64,
    /// Income and expense weights.
    pub economy: EconomyTuning,
    /// Happiness weights and penalties.
    pub happiness: HappinessTuning,
    /// Experience curve.
    pub progression: ProgressionCurve,
    /// Experience rewards.
    pub rewards: ExperienceRewards,
    /// Loan duration and the offers shown to the player.
    pub loans: LoanConfig,
    /// Insolvency thresholds.
    pub bankruptcy: BankruptcyConfig,
    /// Guest population rules.
    pub guests: GuestConfig,
    /// Fixed timer intervals.
    pub timers: TimerConfig,
    /// Built-in scenery seeding.
    pub scenery: SceneryConfig,
    /// Seed for every random choice the simulation makes.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            island: IslandConfig::default(),
            starting_money: 1_000.0,
            economy: EconomyTuning::default(),
            happiness: HappinessTuning::default(),
            progression: ProgressionCurve::default(),
            rewards: ExperienceRewards::default(),
            loans: LoanConfig::default(),
            bankruptcy: BankruptcyConfig::default(),
            guests: GuestConfig::default(),
            timers: TimerConfig::default(),
            scenery: SceneryConfig::default(),
            rng_seed: 0x5EED_1A4D,
        }
    }
}

/// Island geometry: grid bounds, cell size and radial terrain bands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandConfig {
    /// Edge length of a cell in world units.
    pub cell_size: f32,
    /// Largest absolute grid coordinate on either axis.
    pub half_extent: i32,
    /// Cells whose centre lies within this radius are grass.
    pub grass_radius: f32,
    /// Inner edge of the buildable shore ring.
    pub shore_inner: f32,
    /// Outer edge of the buildable shore ring.
    pub shore_outer: f32,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            cell_size: 4.0,
            half_extent: 12,
            grass_radius: 38.0,
            shore_inner: 44.0,
            shore_outer: 49.0,
        }
    }
}

/// Weights used by the economy engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Flat maintenance charged every second.
    pub base_maintenance: f64,
    /// Maintenance per placed building, roads included.
    pub per_building: f64,
    /// Extra upkeep per generator.
    pub per_generator: f64,
    /// Guest services cost per guest.
    pub per_guest: f64,
    /// Extra upkeep per beach DJ booth.
    pub per_beach_dj: f64,
    /// Extra upkeep per utility building other than generators.
    pub per_utility: f64,
    /// Extra upkeep per spa.
    pub per_spa: f64,
    /// Extra upkeep per beach club.
    pub per_beach_club: f64,
    /// Fractional expense growth per player level.
    pub level_scaling: f64,
    /// Upkeep never exceeds this share of income.
    pub upkeep_cap_ratio: f64,
    /// Income boost at full happiness.
    pub happiness_income_boost: f64,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            base_maintenance: 4.0,
            per_building: 0.45,
            per_generator: 1.2,
            per_guest: 0.04,
            per_beach_dj: 1.4,
            per_utility: 0.5,
            per_spa: 1.6,
            per_beach_club: 2.0,
            level_scaling: 0.02,
            upkeep_cap_ratio: 0.2,
            happiness_income_boost: 0.5,
        }
    }
}

/// Weights and penalties feeding the happiness score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HappinessTuning {
    /// Score before any contribution.
    pub base: f64,
    /// Bonus per attraction.
    pub per_attraction: f64,
    /// Bonus per road tile.
    pub per_road: f64,
    /// Ceiling of the road bonus.
    pub road_cap: f64,
    /// Bonus per palm.
    pub per_palm: f64,
    /// Ceiling of the palm bonus.
    pub palm_cap: f64,
    /// Bonus per decor item, palms included.
    pub per_decor: f64,
    /// Ceiling of the decor bonus.
    pub decor_cap: f64,
    /// Penalty per generator.
    pub per_generator: f64,
    /// Non-road building count above which crowding kicks in.
    pub crowding_threshold: u32,
    /// Penalty per building above the crowding threshold.
    pub per_crowded_building: f64,
    /// Ceiling of the crowding penalty.
    pub crowding_cap: f64,
    /// Penalty when the resort has no attraction.
    pub no_attraction_penalty: f64,
    /// Penalty when the resort has no road.
    pub no_road_penalty: f64,
    /// Penalty when the resort has no utility building.
    pub no_utility_penalty: f64,
    /// Penalty while the balance is negative.
    pub negative_balance_penalty: f64,
    /// Penalty while a loan is outstanding.
    pub loan_penalty: f64,
}

impl Default for HappinessTuning {
    fn default() -> Self {
        Self {
            base: 0.0,
            per_attraction: 5.0,
            per_road: 0.8,
            road_cap: 20.0,
            per_palm: 1.2,
            palm_cap: 15.0,
            per_decor: 0.8,
            decor_cap: 18.0,
            per_generator: 2.0,
            crowding_threshold: 18,
            per_crowded_building: 0.5,
            crowding_cap: 10.0,
            no_attraction_penalty: 10.0,
            no_road_penalty: 10.0,
            no_utility_penalty: 6.0,
            negative_balance_penalty: 6.0,
            loan_penalty: 4.0,
        }
    }
}

/// Shape of the experience curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionCurve {
    /// Experience required to leave level one.
    pub initial_xp_to_next: u64,
    /// Multiplier applied to the previous requirement.
    pub growth_factor: f64,
    /// Constant added after scaling.
    pub growth_bonus: f64,
}

impl Default for ProgressionCurve {
    fn default() -> Self {
        Self {
            initial_xp_to_next: 100,
            growth_factor: 1.25,
            growth_bonus: 25.0,
        }
    }
}

/// Experience granted for gameplay milestones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRewards {
    /// Base placement reward, scaled by the item's tier.
    pub building_base: f64,
    /// One-off reward the first time a villa starts earning.
    pub villa_first_earning: u64,
    /// Reward per experience tick while the resort is profitable.
    pub positive_income_tick: u64,
}

impl Default for ExperienceRewards {
    fn default() -> Self {
        Self {
            building_base: 10.0,
            villa_first_earning: 30,
            positive_income_tick: 10,
        }
    }
}

/// A loan the player may choose to take.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    /// Amount credited immediately.
    pub principal: f64,
    /// Interest rate applied once to the principal.
    pub rate: f64,
}

/// Loan duration and the available offers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    /// Repayment period in whole seconds.
    pub duration_secs: u32,
    /// Offers presented to the player.
    pub offers: Vec<LoanOffer>,
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            offers: vec![
                LoanOffer {
                    principal: 500.0,
                    rate: 0.1,
                },
                LoanOffer {
                    principal: 2_000.0,
                    rate: 0.2,
                },
                LoanOffer {
                    principal: 5_000.0,
                    rate: 0.35,
                },
            ],
        }
    }
}

/// Insolvency thresholds watched by the bankruptcy timer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankruptcyConfig {
    /// How long the balance may stay negative, in milliseconds.
    pub negative_grace_ms: u64,
    /// How long debt service may outweigh income, in milliseconds.
    pub debt_grace_ms: u64,
    /// Share of income above which loan payments count as distress.
    pub debt_income_ratio: f64,
}

impl BankruptcyConfig {
    /// Grace period for a negative balance.
    #[must_use]
    pub fn negative_grace(&self) -> Duration {
        Duration::from_millis(self.negative_grace_ms)
    }

    /// Grace period for unsustainable debt.
    #[must_use]
    pub fn debt_grace(&self) -> Duration {
        Duration::from_millis(self.debt_grace_ms)
    }
}

impl Default for BankruptcyConfig {
    fn default() -> Self {
        Self {
            negative_grace_ms: 3_000,
            debt_grace_ms: 5_000,
            debt_income_ratio: 0.75,
        }
    }
}

/// Guest population rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestConfig {
    /// Maximum number of guests walking at once.
    pub max_active: u32,
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self { max_active: 12 }
    }
}

/// Intervals of the fixed simulation timers, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Income collection.
    pub income_ms: u64,
    /// Loan repayment.
    pub loan_ms: u64,
    /// Bankruptcy watchdog.
    pub bankruptcy_ms: u64,
    /// Passive experience.
    pub experience_ms: u64,
    /// Villa earning feed.
    pub villa_status_ms: u64,
    /// Guest spawning.
    pub guest_spawn_ms: u64,
    /// Guest walking.
    pub guest_step_ms: u64,
}

impl TimerConfig {
    /// Interval of the provided timer. Zero intervals are widened to 1 ms.
    #[must_use]
    pub fn interval(&self, timer: TimerKind) -> Duration {
        let millis = match timer {
            TimerKind::Income => self.income_ms,
            TimerKind::Loan => self.loan_ms,
            TimerKind::Bankruptcy => self.bankruptcy_ms,
            TimerKind::Experience => self.experience_ms,
            TimerKind::VillaStatus => self.villa_status_ms,
            TimerKind::GuestSpawn => self.guest_spawn_ms,
            TimerKind::GuestStep => self.guest_step_ms,
        };
        Duration::from_millis(millis.max(1))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            income_ms: 1_000,
            loan_ms: 1_000,
            bankruptcy_ms: 250,
            experience_ms: 30_000,
            villa_status_ms: 1_000,
            guest_spawn_ms: 4_000,
            guest_step_ms: 500,
        }
    }
}

/// Built-in scenery placed on a fresh island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Number of palms scattered along the shore.
    pub palm_count: u32,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self { palm_count: 14 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let source = r#"
            starting_money = 250.0

            [timers]
            guest_spawn_ms = 2000

            [loans]
            duration_secs = 30
        "#;
        let config: SimulationConfig = toml::from_str(source).expect("config parses");
        assert!((config.starting_money - 250.0).abs() < f64::EPSILON);
        assert_eq!(
            config.timers.interval(TimerKind::GuestSpawn),
            Duration::from_secs(2)
        );
        assert_eq!(
            config.timers.interval(TimerKind::Bankruptcy),
            Duration::from_millis(250)
        );
        assert_eq!(config.loans.duration_secs, 30);
        assert_eq!(config.loans.offers.len(), 3);
        assert_eq!(config.island, IslandConfig::default());
    }

    #[test]
    fn zero_interval_is_widened() {
        let timers = TimerConfig {
            income_ms: 0,
            ..TimerConfig::default()
        };
        assert_eq!(timers.interval(TimerKind::Income), Duration::from_millis(1));
    }

    #[test]
    fn default_grace_periods() {
        let config = BankruptcyConfig::default();
        assert_eq!(config.negative_grace(), Duration::from_secs(3));
        assert_eq!(config.debt_grace(), Duration::from_secs(5));
    }
}
