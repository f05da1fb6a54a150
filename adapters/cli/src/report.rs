//! End-of-run summary.

use std::fmt;

use resort_tycoon_core::{BankruptcyCause, Event};
use resort_tycoon_session::Session;
use resort_tycoon_world::query;
use serde::Serialize;

/// Snapshot of a finished run, printed as text or JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct RunReport {
    pub(crate) seed: u64,
    pub(crate) elapsed_secs: f64,
    pub(crate) balance: f64,
    pub(crate) money: String,
    pub(crate) level: u32,
    pub(crate) xp: u64,
    pub(crate) xp_to_next: u64,
    pub(crate) income_per_sec: i64,
    pub(crate) expenses_per_sec: i64,
    pub(crate) net_per_sec: i64,
    pub(crate) happiness: u32,
    pub(crate) guest_capacity: u32,
    pub(crate) active_guests: u32,
    pub(crate) guests_spawned: usize,
    pub(crate) buildings: usize,
    pub(crate) loan_remaining: Option<f64>,
    pub(crate) bankrupt: bool,
    pub(crate) bankruptcy_cause: Option<BankruptcyCause>,
    pub(crate) rejected_steps: usize,
    pub(crate) events: usize,
    pub(crate) tutorial: String,
}

impl RunReport {
    /// Summarises the session. `events` is everything the run emitted.
    pub(crate) fn collect(
        session: &Session,
        seed: u64,
        events: &[Event],
        rejected_steps: usize,
    ) -> Self {
        let world = session.world();
        let economy = query::economy(world);
        let progression = query::progression(world);
        let money = query::money(world);
        let bankruptcy = query::bankruptcy(world);
        Self {
            seed,
            elapsed_secs: session.schedule().elapsed().as_secs_f64(),
            balance: money.balance,
            money: money.formatted,
            level: progression.level,
            xp: progression.xp,
            xp_to_next: progression.xp_to_next,
            income_per_sec: economy.report.income,
            expenses_per_sec: economy.report.expenses,
            net_per_sec: economy.report.total,
            happiness: economy.happiness,
            guest_capacity: economy.guests,
            active_guests: query::active_guests(world),
            guests_spawned: events
                .iter()
                .filter(|event| matches!(event, Event::GuestSpawned { .. }))
                .count(),
            buildings: query::buildings(world).len(),
            loan_remaining: query::loan(world).map(|loan| loan.remaining_owed),
            bankrupt: bankruptcy.bankrupt,
            bankruptcy_cause: bankruptcy.cause,
            rejected_steps,
            events: events.len(),
            tutorial: session.tutorial().message.to_owned(),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed            {}", self.seed)?;
        writeln!(f, "elapsed         {:.1}s", self.elapsed_secs)?;
        writeln!(f, "money           {}", self.money)?;
        writeln!(
            f,
            "level           {} ({}/{} xp)",
            self.level, self.xp, self.xp_to_next
        )?;
        writeln!(
            f,
            "economy         +{}/s income, -{}/s expenses, {}/s net",
            self.income_per_sec, self.expenses_per_sec, self.net_per_sec
        )?;
        writeln!(f, "happiness       {}", self.happiness)?;
        writeln!(
            f,
            "guests          {} walking, {} spawned, capacity {}",
            self.active_guests, self.guests_spawned, self.guest_capacity
        )?;
        writeln!(f, "buildings       {}", self.buildings)?;
        if let Some(remaining) = self.loan_remaining {
            writeln!(f, "loan            {remaining:.2} owed")?;
        }
        if let Some(cause) = self.bankruptcy_cause {
            writeln!(f, "bankrupt        {cause:?}")?;
        }
        writeln!(f, "rejected steps  {}", self.rejected_steps)?;
        write!(f, "tutorial        {}", self.tutorial)
    }
}
