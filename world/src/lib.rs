#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Resort Tycoon.
//!
//! The [`World`] owns buildings, occupancy, money, progression, the loan,
//! the bankruptcy watchdog and walking guests. It is mutated exclusively by
//! [`apply`], which validates each [`Command`] before touching any state,
//! recomputes the derived economy synchronously, and appends the resulting
//! [`Event`] values. Read access goes through the [`query`] module.

mod buildings;
mod finance;
mod guests;
mod occupancy;
mod placement;

use log::{debug, info};
use resort_tycoon_core::{
    BuildingId, BuildingKind, Catalog, CatalogItem, CellCoord, CellRect, Command, Event, Island,
    ProgressionState, Rejection, SimulationConfig, TimerKind, WELCOME_BANNER,
};
use resort_tycoon_system_economy::{EconomyEngine, EconomyOverview, ResortSnapshot};
use resort_tycoon_system_progression::{apply_xp, placement_reward, FirstEarningLedger};

use buildings::BuildingRegistry;
use finance::Finance;
use guests::GuestRoster;
use occupancy::OccupancyMap;
use placement::{validate_purchase, SiteContext};

pub use finance::BankruptcyState;
pub use guests::{GuestPhase, GuestView};

/// Represents the authoritative Resort Tycoon world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    catalog: Catalog,
    island: Island,
    engine: EconomyEngine,
    buildings: BuildingRegistry,
    occupancy: OccupancyMap,
    finance: Finance,
    progression: ProgressionState,
    first_earnings: FirstEarningLedger,
    guests: GuestRoster,
    economy: EconomyOverview,
}

impl World {
    /// Creates a fresh island using the default configuration and catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default(), Catalog::standard())
    }

    /// Creates a fresh island using the provided configuration and catalog.
    #[must_use]
    pub fn with_config(config: SimulationConfig, catalog: Catalog) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            island: Island::new(config.island),
            engine: EconomyEngine::new(config.economy, config.happiness),
            buildings: BuildingRegistry::new(),
            occupancy: OccupancyMap::new(),
            finance: Finance::new(config.starting_money),
            progression: ProgressionState::initial(&config.progression),
            first_earnings: FirstEarningLedger::new(),
            guests: GuestRoster::new(),
            economy: EconomyOverview::default(),
            config,
            catalog,
        };
        world.economy = world.evaluate();
        world
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.buildings = BuildingRegistry::new();
        self.occupancy = OccupancyMap::new();
        self.finance = Finance::new(self.config.starting_money);
        self.progression = ProgressionState::initial(&self.config.progression);
        self.first_earnings.clear();
        self.guests = GuestRoster::new();
        out_events.push(Event::GameReset {
            balance: self.finance.balance(),
        });
        self.refresh(out_events);
    }

    fn item(&self, kind: BuildingKind) -> Result<CatalogItem, Rejection> {
        self.catalog
            .get(kind)
            .cloned()
            .ok_or(Rejection::UnknownItem(kind))
    }

    fn site_context(&self) -> SiteContext<'_> {
        SiteContext {
            island: &self.island,
            occupancy: &self.occupancy,
            buildings: &self.buildings,
        }
    }

    fn evaluate(&self) -> EconomyOverview {
        let buildings = self.buildings.snapshots();
        self.engine.evaluate(ResortSnapshot {
            buildings: &buildings,
            catalog: &self.catalog,
            level: self.progression.level,
            balance: self.finance.balance(),
            loan_payment_per_sec: self.finance.loan_payment_per_sec(),
            has_loan: self.finance.loan().is_some(),
        })
    }

    /// Recomputes derived state and pays out first-earning bonuses.
    fn refresh(&mut self, out_events: &mut Vec<Event>) {
        let mut overview = self.evaluate();

        let first_earners: Vec<BuildingId> = overview
            .report
            .statuses
            .iter()
            .filter(|status| status.kind.is_villa() && status.active)
            .map(|status| status.building)
            .filter(|building| self.first_earnings.record(*building))
            .collect();
        if !first_earners.is_empty() {
            let reward = self.config.rewards.villa_first_earning;
            for _ in &first_earners {
                self.award_xp(reward, out_events);
            }
            overview = self.evaluate();
        }

        if overview != self.economy {
            out_events.push(Event::EconomyRecomputed {
                total: overview.report.total,
                income: overview.report.income,
                expenses: overview.report.expenses,
                happiness: overview.happiness,
                guests: overview.guests,
            });
        }
        self.economy = overview;
    }

    fn award_xp(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        let previous_level = self.progression.level;
        let outcome = apply_xp(self.progression, amount, &self.config.progression);
        self.progression = outcome.next;
        out_events.push(Event::ExperienceGained {
            amount,
            progression: outcome.next,
        });
        if outcome.leveled_up {
            let unlocked = self
                .catalog
                .unlocked_between(previous_level, outcome.next.level);
            info!(
                "reached level {} ({} new items)",
                outcome.next.level,
                unlocked.len()
            );
            out_events.push(Event::LeveledUp {
                level: outcome.next.level,
                levels_gained: outcome.levels_gained,
                unlocked,
            });
        }
    }

    fn adjust_funds(&mut self, delta: f64, out_events: &mut Vec<Event>) {
        let balance = self.finance.adjust(delta);
        out_events.push(Event::FundsChanged { balance, delta });
    }

    fn place_building(
        &mut self,
        kind: BuildingKind,
        anchor: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let item = self.item(kind)?;
        let region = CellRect::from_anchor_and_footprint(anchor, item.footprint);
        self.site_context().validate(&item, region, None)?;
        validate_purchase(&item, self.progression.level, self.finance.balance())?;

        let building = self.buildings.insert(kind, region);
        self.occupancy.occupy(building, region, kind.is_road());
        out_events.push(Event::BuildingPlaced {
            building,
            kind,
            region,
            cost: item.cost,
        });
        self.adjust_funds(-f64::from(item.cost), out_events);
        self.award_xp(placement_reward(&item, &self.config.rewards), out_events);
        self.refresh(out_events);
        Ok(())
    }

    fn move_building(
        &mut self,
        building: BuildingId,
        anchor: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let state = self
            .buildings
            .get(building)
            .cloned()
            .ok_or(Rejection::MissingBuilding(building))?;
        if state.kind.is_road() {
            return Err(Rejection::Immovable(state.kind));
        }
        let from = state.region.anchor();
        if from == anchor {
            return Ok(());
        }
        let item = self.item(state.kind)?;
        let region = CellRect::from_anchor_and_footprint(anchor, state.region.footprint());
        self.site_context()
            .validate(&item, region, Some(building))?;

        self.occupancy.vacate(state.region);
        self.occupancy.occupy(building, region, false);
        let _ = self.buildings.relocate(building, anchor);
        out_events.push(Event::BuildingMoved {
            building,
            from,
            to: anchor,
        });
        self.refresh(out_events);
        Ok(())
    }

    fn demolish_building(
        &mut self,
        building: BuildingId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let state = self
            .buildings
            .remove(building)
            .ok_or(Rejection::MissingBuilding(building))?;
        self.occupancy.vacate(state.region);
        out_events.push(Event::BuildingDemolished {
            building,
            kind: state.kind,
            region: state.region,
        });
        self.refresh(out_events);
        Ok(())
    }

    fn take_loan(
        &mut self,
        principal: f64,
        rate: f64,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        if self.finance.loan().is_some() {
            return Ok(());
        }
        if !principal.is_finite() || principal <= 0.0 || !rate.is_finite() || rate < 0.0 {
            return Err(Rejection::InvalidLoanTerms);
        }
        if !(principal * (1.0 + rate)).is_finite() {
            return Err(Rejection::InvalidLoanTerms);
        }

        let loan = self
            .finance
            .issue_loan(principal, rate, self.config.loans.duration_secs);
        info!(
            "loan issued: {principal} at {rate}, {} owed",
            loan.total_owed
        );
        out_events.push(Event::LoanIssued { loan });
        out_events.push(Event::FundsChanged {
            balance: self.finance.balance(),
            delta: principal,
        });
        self.refresh(out_events);
        Ok(())
    }

    fn tick(&mut self, timer: TimerKind, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimerElapsed { timer });
        let total = self.economy.report.total;
        match timer {
            TimerKind::Income => {
                if total > 0 {
                    let amount = total as f64;
                    out_events.push(Event::IncomeCollected { amount });
                    self.adjust_funds(amount, out_events);
                    self.refresh(out_events);
                }
            }
            TimerKind::Loan => {
                if let Some(payment) = self.finance.pay_loan() {
                    out_events.push(Event::FundsChanged {
                        balance: self.finance.balance(),
                        delta: -payment.amount,
                    });
                    out_events.push(Event::LoanPaymentMade {
                        amount: payment.amount,
                        remaining: payment.remaining,
                    });
                    if payment.repaid {
                        info!("loan repaid");
                        out_events.push(Event::LoanRepaid);
                    }
                    self.refresh(out_events);
                }
            }
            TimerKind::Bankruptcy => {
                let elapsed = self.config.timers.interval(TimerKind::Bankruptcy);
                if let Some(cause) = self
                    .finance
                    .watch(elapsed, total, &self.config.bankruptcy)
                {
                    info!("resort went bankrupt: {cause:?}");
                    out_events.push(Event::Bankrupted { cause });
                }
            }
            TimerKind::Experience => {
                if total > 0 {
                    self.award_xp(self.config.rewards.positive_income_tick, out_events);
                    self.refresh(out_events);
                }
            }
            TimerKind::VillaStatus => {
                for status in &self.economy.report.statuses {
                    if status.kind.is_villa() && status.active {
                        out_events.push(Event::VillaEarning {
                            building: status.building,
                            anchor: status.anchor,
                            income: status.income_per_sec,
                        });
                    }
                }
            }
            TimerKind::GuestSpawn => {}
            TimerKind::GuestStep => self.guests.step(out_events),
        }
    }

    fn spawn_guest(
        &mut self,
        origin: BuildingId,
        destination: BuildingId,
        path: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let cap = self.config.guests.max_active;
        if self.guests.len() >= cap as usize {
            return Err(Rejection::GuestCapReached(cap));
        }
        let origin = self
            .buildings
            .get(origin)
            .ok_or(Rejection::MissingBuilding(origin))?;
        let destination = self
            .buildings
            .get(destination)
            .ok_or(Rejection::MissingBuilding(destination))?;
        let walkable = origin.kind.is_villa()
            && self
                .catalog
                .get(destination.kind)
                .is_some_and(CatalogItem::is_guest_destination);
        if !walkable {
            return Err(Rejection::InvalidGuestPath);
        }
        let (origin, origin_anchor) = (origin.id, origin.region.anchor());
        let (destination, destination_anchor) = (destination.id, destination.region.anchor());

        let roads = self.occupancy.roads();
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(Rejection::InvalidGuestPath);
        };
        let connected = path.iter().all(|cell| roads.contains(cell))
            && path
                .windows(2)
                .all(|pair| pair[0].manhattan_distance(pair[1]) == 1)
            && origin_anchor.neighbors4().contains(first)
            && destination_anchor.neighbors4().contains(last);
        if !connected {
            return Err(Rejection::InvalidGuestPath);
        }

        let guest = self.guests.spawn(origin, destination, path.clone());
        out_events.push(Event::GuestSpawned {
            guest,
            origin,
            destination,
            path,
        });
        Ok(())
    }

    fn place_scenery(
        &mut self,
        kind: BuildingKind,
        anchors: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        let item = self.item(kind)?;
        let mut placed = 0usize;
        for anchor in anchors {
            let region = CellRect::from_anchor_and_footprint(anchor, item.footprint);
            if self.site_context().validate(&item, region, None).is_err() {
                continue;
            }
            let building = self.buildings.insert(kind, region);
            self.occupancy.occupy(building, region, kind.is_road());
            out_events.push(Event::BuildingPlaced {
                building,
                kind,
                region,
                cost: 0,
            });
            placed += 1;
        }
        if placed > 0 {
            debug!("placed {placed} {kind} as scenery");
            self.refresh(out_events);
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and append no events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), Rejection> {
    if world.finance.is_bankrupt() && command != Command::ResetGame {
        return Err(Rejection::Bankrupt);
    }

    let result = match command {
        Command::PlaceBuilding { kind, anchor } => world.place_building(kind, anchor, out_events),
        Command::MoveBuilding { building, anchor } => {
            world.move_building(building, anchor, out_events)
        }
        Command::DemolishBuilding { building } => world.demolish_building(building, out_events),
        Command::TakeLoan { principal, rate } => world.take_loan(principal, rate, out_events),
        Command::Tick { timer } => {
            world.tick(timer, out_events);
            Ok(())
        }
        Command::SpawnGuest {
            origin,
            destination,
            path,
        } => world.spawn_guest(origin, destination, path, out_events),
        Command::PlaceScenery { kind, anchors } => world.place_scenery(kind, anchors, out_events),
        Command::ResetGame => {
            world.reset(out_events);
            info!("world reset");
            Ok(())
        }
    };

    if let Err(rejection) = &result {
        debug!("command rejected: {rejection}");
    }
    result
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::{BTreeMap, BTreeSet};

    use resort_tycoon_core::{
        BuildingId, BuildingKind, BuildingSnapshot, Catalog, CellCoord, CellRect, Island,
        LoanOffer, LoanState, MoneyView, ProgressionState, Rejection, SimulationConfig,
    };
    use resort_tycoon_system_economy::{EconomyOverview, EconomyStatus, ItemStats};

    use super::{placement::validate_purchase, BankruptcyState, GuestView, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Catalog the world places buildings from.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Island geometry.
    #[must_use]
    pub fn island(world: &World) -> &Island {
        &world.island
    }

    /// Every building in placement order.
    #[must_use]
    pub fn buildings(world: &World) -> Vec<BuildingSnapshot> {
        world.buildings.snapshots()
    }

    /// Looks up a single building.
    #[must_use]
    pub fn building(world: &World, building: BuildingId) -> Option<BuildingSnapshot> {
        world.buildings.get(building).map(|state| state.snapshot())
    }

    /// Building covering the provided cell, if any.
    #[must_use]
    pub fn building_at(world: &World, cell: CellCoord) -> Option<BuildingId> {
        world.occupancy.occupant(cell)
    }

    /// Exposes a read-only view of the occupancy map.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView {
            cells: world.occupancy.cells(),
        }
    }

    /// Cells covered by roads.
    #[must_use]
    pub fn road_cells(world: &World) -> &BTreeSet<CellCoord> {
        world.occupancy.roads()
    }

    /// Economy derived after the last mutation.
    #[must_use]
    pub fn economy(world: &World) -> &EconomyOverview {
        &world.economy
    }

    /// Earning status of every income-bearing building.
    #[must_use]
    pub fn statuses(world: &World) -> &[EconomyStatus] {
        &world.economy.report.statuses
    }

    /// Exact balance.
    #[must_use]
    pub fn balance(world: &World) -> f64 {
        world.finance.balance()
    }

    /// Balance prepared for display.
    #[must_use]
    pub fn money(world: &World) -> MoneyView {
        MoneyView::from_balance(world.finance.balance())
    }

    /// Level and experience.
    #[must_use]
    pub fn progression(world: &World) -> ProgressionState {
        world.progression
    }

    /// Outstanding loan, if any.
    #[must_use]
    pub fn loan(world: &World) -> Option<LoanState> {
        world.finance.loan()
    }

    /// Loans the player may take.
    #[must_use]
    pub fn loan_offers(world: &World) -> &[LoanOffer] {
        &world.config.loans.offers
    }

    /// Insolvency watchdog state.
    #[must_use]
    pub fn bankruptcy(world: &World) -> BankruptcyState {
        world.finance.bankruptcy()
    }

    /// Reports whether the resort is bankrupt.
    #[must_use]
    pub fn is_bankrupt(world: &World) -> bool {
        world.finance.is_bankrupt()
    }

    /// Guests currently walking, ordered by identifier.
    #[must_use]
    pub fn guests(world: &World) -> Vec<GuestView> {
        world.guests.views()
    }

    /// Number of guests currently walking.
    #[must_use]
    pub fn active_guests(world: &World) -> u32 {
        u32::try_from(world.guests.len()).unwrap_or(u32::MAX)
    }

    /// Region an item would cover if anchored at `anchor`.
    #[must_use]
    pub fn footprint_region(
        world: &World,
        kind: BuildingKind,
        anchor: CellCoord,
    ) -> Option<CellRect> {
        world
            .catalog
            .get(kind)
            .map(|item| CellRect::from_anchor_and_footprint(anchor, item.footprint))
    }

    /// Runs every placement check a purchase would, without mutating the world.
    pub fn validate_placement(
        world: &World,
        kind: BuildingKind,
        anchor: CellCoord,
    ) -> Result<(), Rejection> {
        let item = world.item(kind)?;
        let region = CellRect::from_anchor_and_footprint(anchor, item.footprint);
        world.site_context().validate(&item, region, None)?;
        validate_purchase(&item, world.progression.level, world.finance.balance())?;
        Ok(())
    }

    /// Runs the bounds, terrain, overlap and spacing checks only.
    pub fn validate_site(
        world: &World,
        kind: BuildingKind,
        anchor: CellCoord,
    ) -> Result<(), Rejection> {
        let item = world.item(kind)?;
        let region = CellRect::from_anchor_and_footprint(anchor, item.footprint);
        world.site_context().validate(&item, region, None)?;
        Ok(())
    }

    /// Shop stat card for a catalog entry.
    #[must_use]
    pub fn item_stats(world: &World, kind: BuildingKind) -> Option<ItemStats> {
        world
            .catalog
            .get(kind)
            .map(|item| world.engine.item_stats(item))
    }

    /// Read-only view into the occupancy map.
    #[derive(Clone, Copy, Debug)]
    pub struct OccupancyView<'a> {
        cells: &'a BTreeMap<CellCoord, BuildingId>,
    }

    impl<'a> OccupancyView<'a> {
        /// Returns the building occupying the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<BuildingId> {
            self.cells.get(&cell).copied()
        }

        /// Reports whether the cell is free.
        #[must_use]
        pub fn is_free(&self, cell: CellCoord) -> bool {
            !self.cells.contains_key(&cell)
        }

        /// Returns an iterator over all occupied cells in cell order.
        pub fn iter(&self) -> impl Iterator<Item = (CellCoord, BuildingId)> + 'a {
            self.cells.iter().map(|(cell, building)| (*cell, *building))
        }

        /// Number of occupied cells.
        #[must_use]
        pub fn len(&self) -> usize {
            self.cells.len()
        }

        /// Reports whether no cell is occupied.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.cells.is_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_tycoon_core::PlacementError;

    fn place(
        world: &mut World,
        kind: BuildingKind,
        gx: i32,
        gz: i32,
    ) -> Result<Vec<Event>, Rejection> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceBuilding {
                kind,
                anchor: CellCoord::new(gx, gz),
            },
            &mut events,
        )?;
        Ok(events)
    }

    #[test]
    fn new_world_starts_with_empty_island() {
        let world = World::new();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert!(query::buildings(&world).is_empty());
        assert!(query::occupancy_view(&world).is_empty());
        assert_eq!(query::money(&world).display, 1_000);
        assert_eq!(query::progression(&world), ProgressionState::default());
        assert!(query::loan(&world).is_none());
        assert_eq!(query::economy(&world).report.total, 0);
    }

    #[test]
    fn placement_charges_and_awards_experience() {
        let mut world = World::new();
        let events = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");

        let building = BuildingId::new(0);
        assert!(matches!(
            events.first(),
            Some(Event::BuildingPlaced {
                building: placed,
                kind: BuildingKind::Villa,
                cost: 200,
                ..
            }) if *placed == building
        ));
        assert!(events.contains(&Event::FundsChanged {
            balance: 800.0,
            delta: -200.0,
        }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ExperienceGained { amount: 15, .. })));
        assert_eq!(query::progression(&world).xp, 15);
        assert_eq!(query::occupancy_view(&world).len(), 4);
        for gx in 0..2 {
            for gz in 0..2 {
                assert_eq!(
                    query::building_at(&world, CellCoord::new(gx, gz)),
                    Some(building)
                );
            }
        }
    }

    #[test]
    fn rejected_placement_leaves_world_untouched() {
        let mut world = World::new();
        let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");
        let before_balance = query::balance(&world);
        let before_buildings = query::buildings(&world);

        let rejection = place(&mut world, BuildingKind::Villa, 1, 1).expect_err("overlap");

        assert_eq!(rejection, Rejection::Placement(PlacementError::TileOccupied));
        assert_eq!(query::balance(&world), before_balance);
        assert_eq!(query::buildings(&world), before_buildings);
    }

    #[test]
    fn roads_feed_the_road_network() {
        let mut world = World::new();
        let _ = place(&mut world, BuildingKind::Road, 2, 2).expect("road placed");
        assert!(query::road_cells(&world).contains(&CellCoord::new(2, 2)));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DemolishBuilding {
                building: BuildingId::new(0),
            },
            &mut events,
        )
        .expect("demolished");
        assert!(query::road_cells(&world).is_empty());
    }

    #[test]
    fn validate_placement_matches_apply() {
        let world = World::new();
        assert_eq!(
            query::validate_placement(&world, BuildingKind::Spa, CellCoord::new(0, 0)),
            Err(Rejection::Placement(PlacementError::LevelLocked {
                required: 8
            }))
        );
        assert_eq!(
            query::validate_placement(&world, BuildingKind::Villa, CellCoord::new(0, 0)),
            Ok(())
        );
    }
}
