#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Resort Tycoon engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod catalog;
pub mod config;
pub mod grid;
pub mod terrain;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    BuildingKind, Catalog, CatalogError, CatalogItem, Category, PowerProfile, SiteRule,
};
pub use config::{
    BankruptcyConfig, EconomyTuning, ExperienceRewards, GuestConfig, HappinessTuning,
    IslandConfig, LoanConfig, LoanOffer, ProgressionCurve, SceneryConfig, SimulationConfig,
    TimerConfig,
};
pub use grid::{CellCoord, CellKey, CellRect, Footprint, GridMapper};
pub use terrain::{Island, Terrain};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Resort Tycoon.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Requests a purchased building anchored at the provided cell.
    PlaceBuilding {
        /// Catalog entry to build.
        kind: BuildingKind,
        /// Minimum corner of the footprint.
        anchor: CellCoord,
    },
    /// Requests that an existing building relocate to a new anchor.
    MoveBuilding {
        /// Building to relocate.
        building: BuildingId,
        /// Destination anchor.
        anchor: CellCoord,
    },
    /// Requests removal of an existing building.
    DemolishBuilding {
        /// Building to remove.
        building: BuildingId,
    },
    /// Requests a loan with the provided terms.
    TakeLoan {
        /// Amount to credit immediately.
        principal: f64,
        /// Interest applied once to the principal.
        rate: f64,
    },
    /// Signals that a fixed-interval timer elapsed.
    Tick {
        /// Timer that fired.
        timer: TimerKind,
    },
    /// Requests that a guest start walking the provided road path.
    SpawnGuest {
        /// Villa the guest leaves from.
        origin: BuildingId,
        /// Building the guest visits.
        destination: BuildingId,
        /// Road cells from the origin's road anchor to the destination's.
        path: Vec<CellCoord>,
    },
    /// Places free built-in scenery, skipping anchors that cannot host it.
    PlaceScenery {
        /// Catalog entry to place.
        kind: BuildingKind,
        /// Candidate anchors, tried in order.
        anchors: Vec<CellCoord>,
    },
    /// Restores the world to a fresh island.
    ResetGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that the world returned to a fresh island.
    GameReset {
        /// Balance after the reset.
        balance: f64,
    },
    /// Announces that a building was placed.
    BuildingPlaced {
        /// Identifier allocated to the building.
        building: BuildingId,
        /// Kind of building placed.
        kind: BuildingKind,
        /// Cells the building covers.
        region: CellRect,
        /// Amount charged for the placement.
        cost: u32,
    },
    /// Announces that a building moved.
    BuildingMoved {
        /// Building that moved.
        building: BuildingId,
        /// Previous anchor.
        from: CellCoord,
        /// New anchor.
        to: CellCoord,
    },
    /// Announces that a building was demolished.
    BuildingDemolished {
        /// Building that was removed.
        building: BuildingId,
        /// Kind of the removed building.
        kind: BuildingKind,
        /// Cells the building covered.
        region: CellRect,
    },
    /// Reports a change to the player's balance.
    FundsChanged {
        /// Balance after the change.
        balance: f64,
        /// Signed amount applied.
        delta: f64,
    },
    /// Reports income collected by the income timer.
    IncomeCollected {
        /// Amount credited.
        amount: f64,
    },
    /// Reports experience awarded to the player.
    ExperienceGained {
        /// Experience awarded.
        amount: u64,
        /// Progression after the award.
        progression: ProgressionState,
    },
    /// Reports that the player reached a new level.
    LeveledUp {
        /// Level reached.
        level: u32,
        /// Number of levels gained by the award.
        levels_gained: u32,
        /// Catalog entries unlocked by the new level.
        unlocked: Vec<BuildingKind>,
    },
    /// Reports the derived economy after a mutation.
    EconomyRecomputed {
        /// Net income per second.
        total: i64,
        /// Gross income per second.
        income: i64,
        /// Upkeep plus loan payments per second.
        expenses: i64,
        /// Happiness score between 0 and 100.
        happiness: u32,
        /// Guest count.
        guests: u32,
    },
    /// Reports that a loan was issued.
    LoanIssued {
        /// Terms of the new loan.
        loan: LoanState,
    },
    /// Reports a scheduled loan payment.
    LoanPaymentMade {
        /// Amount debited.
        amount: f64,
        /// Amount still owed.
        remaining: f64,
    },
    /// Reports that the outstanding loan was fully repaid.
    LoanRepaid,
    /// Reports that the resort went bankrupt.
    Bankrupted {
        /// Condition that triggered insolvency.
        cause: BankruptcyCause,
    },
    /// Reports that a guest started walking.
    GuestSpawned {
        /// Identifier allocated to the guest.
        guest: GuestId,
        /// Villa the guest left.
        origin: BuildingId,
        /// Building the guest visits.
        destination: BuildingId,
        /// Outbound road path.
        path: Vec<CellCoord>,
    },
    /// Reports that a guest stepped onto a new cell.
    GuestAdvanced {
        /// Guest that moved.
        guest: GuestId,
        /// Cell the guest now stands on.
        cell: CellCoord,
    },
    /// Reports that a guest reached its destination.
    GuestArrived {
        /// Guest that arrived.
        guest: GuestId,
        /// Building visited.
        destination: BuildingId,
    },
    /// Reports that a guest returned home and left the simulation.
    GuestDeparted {
        /// Guest that departed.
        guest: GuestId,
    },
    /// Reports a villa that earned during the last status tick.
    VillaEarning {
        /// Earning villa.
        building: BuildingId,
        /// Anchor of the villa.
        anchor: CellCoord,
        /// Effective income per second.
        income: i64,
    },
    /// Reports that a timer tick was processed.
    TimerElapsed {
        /// Timer that fired.
        timer: TimerKind,
    },
}

/// Fixed-interval timers driving the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Credits net income.
    Income,
    /// Debits the loan payment.
    Loan,
    /// Watches for insolvency.
    Bankruptcy,
    /// Grants passive experience.
    Experience,
    /// Feeds villa earning notifications.
    VillaStatus,
    /// Attempts to spawn a guest.
    GuestSpawn,
    /// Advances walking guests.
    GuestStep,
}

impl TimerKind {
    /// All timers in firing order for equal due times.
    pub const ALL: [TimerKind; 7] = [
        TimerKind::Income,
        TimerKind::Loan,
        TimerKind::Bankruptcy,
        TimerKind::Experience,
        TimerKind::VillaStatus,
        TimerKind::GuestSpawn,
        TimerKind::GuestStep,
    ];
}

/// Unique identifier assigned to each placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u64);

impl BuildingId {
    /// Creates a new building identifier with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier assigned to each guest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuestId(u32);

impl GuestId {
    /// Creates a new guest identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Read-only snapshot of a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    /// Identifier allocated when the building was placed.
    pub id: BuildingId,
    /// Catalog entry the building was built from.
    pub kind: BuildingKind,
    /// Cells the building covers; the anchor is the minimum corner.
    pub region: CellRect,
}

impl BuildingSnapshot {
    /// Minimum corner of the building's footprint.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.region.anchor()
    }
}

/// Reasons a placement or move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Part of the footprint lies outside the grid.
    #[error("placement extends beyond the island grid")]
    OutOfBounds,
    /// Part of the footprint lies on terrain the item cannot use.
    #[error("terrain cannot host this building")]
    Unbuildable,
    /// Part of the footprint overlaps another building.
    #[error("tile is already occupied")]
    TileOccupied,
    /// The item would sit too close to another of its kind.
    #[error("too close to a similar building")]
    SpacingViolation,
    /// The player's level is below the item's unlock level.
    #[error("requires level {required}")]
    LevelLocked {
        /// Level that unlocks the item.
        required: u32,
    },
    /// The player cannot afford the item.
    #[error("costs {cost} coins")]
    InsufficientFunds {
        /// Price of the item.
        cost: u32,
    },
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// Placement validation failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// No building with the provided identifier exists.
    #[error("building {0} does not exist")]
    MissingBuilding(BuildingId),
    /// The building kind cannot be moved.
    #[error("{0} cannot be moved")]
    Immovable(BuildingKind),
    /// The catalog has no entry for the kind.
    #[error("catalog has no `{0}`")]
    UnknownItem(BuildingKind),
    /// Loan principal or rate is not acceptable.
    #[error("loan terms are invalid")]
    InvalidLoanTerms,
    /// The guest population is at its limit.
    #[error("guest limit of {0} reached")]
    GuestCapReached(u32),
    /// The guest path is not a contiguous road route between the buildings.
    #[error("guest path is not a connected road route")]
    InvalidGuestPath,
    /// The resort is bankrupt and only accepts a reset.
    #[error("the resort is bankrupt")]
    Bankrupt,
}

/// Player level and experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Current level, starting at one.
    pub level: u32,
    /// Experience accumulated towards the next level.
    pub xp: u64,
    /// Experience required to reach the next level.
    pub xp_to_next: u64,
}

impl ProgressionState {
    /// Fresh progression at level one for the provided curve.
    #[must_use]
    pub fn initial(curve: &ProgressionCurve) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: curve.initial_xp_to_next.max(1),
        }
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::initial(&ProgressionCurve::default())
    }
}

/// Terms and repayment progress of the outstanding loan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    /// Amount credited when the loan was issued.
    pub principal: f64,
    /// Interest applied once to the principal.
    pub rate: f64,
    /// Principal plus interest, rounded to whole coins.
    pub total_owed: f64,
    /// Amount still owed.
    pub remaining_owed: f64,
    /// Amount debited by each loan tick.
    pub payment_per_second: f64,
    /// Number of payments made so far.
    pub payments_made: u32,
    /// Number of payments scheduled.
    pub duration_secs: u32,
}

impl LoanState {
    /// Computes the repayment schedule for a new loan.
    #[must_use]
    pub fn issue(principal: f64, rate: f64, duration_secs: u32) -> Self {
        let total_owed = (principal * (1.0 + rate)).round();
        let duration_secs = duration_secs.max(1);
        Self {
            principal,
            rate,
            total_owed,
            remaining_owed: total_owed,
            payment_per_second: total_owed / f64::from(duration_secs),
            payments_made: 0,
            duration_secs,
        }
    }
}

/// Condition that drove the resort into bankruptcy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankruptcyCause {
    /// The balance stayed negative for too long.
    NegativeBalance,
    /// Loan payments outweighed income for too long.
    UnsustainableDebt,
}

/// Player balance prepared for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoneyView {
    /// Exact balance.
    pub balance: f64,
    /// Balance rounded to whole coins.
    pub display: i64,
    /// Rounded balance with thousands separators.
    pub formatted: String,
}

impl MoneyView {
    /// Prepares the provided balance for display.
    #[must_use]
    pub fn from_balance(balance: f64) -> Self {
        let display = balance.round() as i64;
        Self {
            balance,
            display,
            formatted: format_thousands(display),
        }
    }
}

fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn commands_round_trip_through_bincode() {
        assert_round_trip(&Command::PlaceBuilding {
            kind: BuildingKind::BeachClub,
            anchor: CellCoord::new(-11, 3),
        });
        assert_round_trip(&Command::SpawnGuest {
            origin: BuildingId::new(1),
            destination: BuildingId::new(4),
            path: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        });
        assert_round_trip(&Command::Tick {
            timer: TimerKind::GuestStep,
        });
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::LeveledUp {
            level: 3,
            levels_gained: 2,
            unlocked: vec![BuildingKind::Lantern, BuildingKind::BurgerShop],
        });
        assert_round_trip(&Event::LoanIssued {
            loan: LoanState::issue(500.0, 0.1, 60),
        });
    }

    #[test]
    fn loan_schedule_spreads_total_over_duration() {
        let loan = LoanState::issue(500.0, 0.1, 60);
        assert!((loan.total_owed - 550.0).abs() < 1e-9);
        assert!((loan.payment_per_second - 550.0 / 60.0).abs() < 1e-9);
        assert_eq!(loan.payments_made, 0);
        assert!((loan.remaining_owed - loan.total_owed).abs() < f64::EPSILON);
    }

    #[test]
    fn money_view_groups_thousands() {
        assert_eq!(MoneyView::from_balance(1_000.0).formatted, "1,000");
        assert_eq!(MoneyView::from_balance(999.4).formatted, "999");
        assert_eq!(MoneyView::from_balance(-1_234_567.6).formatted, "-1,234,568");
        assert_eq!(MoneyView::from_balance(0.0).display, 0);
    }

    #[test]
    fn rejections_describe_themselves() {
        let rejection = Rejection::from(PlacementError::LevelLocked { required: 4 });
        assert_eq!(rejection.to_string(), "requires level 4");
        assert_eq!(
            Rejection::MissingBuilding(BuildingId::new(7)).to_string(),
            "building #7 does not exist"
        );
        assert_eq!(
            Rejection::Immovable(BuildingKind::Road).to_string(),
            "road cannot be moved"
        );
    }

    #[test]
    fn initial_progression_starts_at_level_one() {
        let state = ProgressionState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.xp, 0);
        assert_eq!(state.xp_to_next, 100);
    }

    #[test]
    fn timer_order_is_stable() {
        let mut sorted = TimerKind::ALL;
        sorted.sort();
        assert_eq!(sorted, TimerKind::ALL);
    }
}
