//! Scripted play sessions loaded from TOML.

use std::time::Duration;

use log::warn;
use resort_tycoon_core::{BuildingId, BuildingKind, CellCoord, Command, Rejection};
use resort_tycoon_session::Session;
use resort_tycoon_world::query;
use serde::Deserialize;

/// Scenario shipped with the binary and used when `--scenario` is omitted.
pub(crate) const STARTER: &str = include_str!("../scenarios/starter.toml");

const DEFAULT_FRAME_MS: u64 = 100;

/// Timed list of player actions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Scenario {
    /// Simulated seconds to run for.
    pub(crate) run_secs: f64,
    /// Simulation step length.
    #[serde(default = "default_frame_ms")]
    pub(crate) frame_ms: u64,
    /// Plants the seeded shoreline palms before the first step.
    #[serde(default)]
    pub(crate) seed_scenery: bool,
    /// Player actions in any order; they run sorted by time.
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

fn default_frame_ms() -> u64 {
    DEFAULT_FRAME_MS
}

/// One action scheduled at a point in simulated time.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Step {
    /// Simulated second the action runs at.
    #[serde(default)]
    pub(crate) at_secs: f64,
    /// What the player does.
    #[serde(flatten)]
    pub(crate) action: Action,
}

/// Player action expressed in scenario terms.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Action {
    /// Buys a building.
    Place {
        /// Catalog entry.
        kind: BuildingKind,
        /// Anchor column.
        gx: i32,
        /// Anchor row.
        gz: i32,
    },
    /// Paints a straight road from `from` towards `to`.
    Road {
        /// Start cell as `[gx, gz]`.
        from: [i32; 2],
        /// Pointer cell as `[gx, gz]`.
        to: [i32; 2],
    },
    /// Relocates a building.
    Move {
        /// Building identifier.
        building: u64,
        /// Target anchor column.
        gx: i32,
        /// Target anchor row.
        gz: i32,
    },
    /// Removes a building.
    Demolish {
        /// Building identifier.
        building: u64,
    },
    /// Takes one of the configured loan offers.
    Loan {
        /// Index into the configured offers.
        offer: usize,
    },
    /// Starts over.
    Reset,
}

impl Scenario {
    /// Parses a scenario document.
    pub(crate) fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        let mut scenario: Self = toml::from_str(source)?;
        scenario
            .steps
            .sort_by(|left, right| left.at_secs.total_cmp(&right.at_secs));
        Ok(scenario)
    }

    /// Plays the scenario and returns how many actions were rejected.
    pub(crate) fn play(&self, session: &mut Session) -> usize {
        let mut rejected = 0;
        if self.seed_scenery {
            if let Err(rejection) = session.seed_scenery() {
                warn!("scenery was not planted: {rejection}");
            }
        }

        let frame = Duration::from_millis(self.frame_ms.max(1));
        let end = Duration::from_secs_f64(self.run_secs.max(0.0));
        let mut elapsed = Duration::ZERO;
        let mut steps = self.steps.iter().peekable();
        loop {
            while let Some(step) = steps.next_if(|step| step.at_secs <= elapsed.as_secs_f64()) {
                if let Err(rejection) = perform(session, &step.action) {
                    warn!("step at {}s rejected: {rejection}", step.at_secs);
                    rejected += 1;
                }
            }
            if elapsed >= end {
                break;
            }
            let dt = frame.min(end - elapsed);
            let _ = session.advance(dt);
            elapsed += dt;
        }
        rejected
    }
}

fn perform(session: &mut Session, action: &Action) -> Result<(), Rejection> {
    match *action {
        Action::Place { kind, gx, gz } => session.apply(Command::PlaceBuilding {
            kind,
            anchor: CellCoord::new(gx, gz),
        }),
        Action::Road { from, to } => {
            session.begin_road_drag(CellCoord::new(from[0], from[1]))?;
            let outcome = session.extend_road_drag(CellCoord::new(to[0], to[1]));
            let _ = session.end_road_drag();
            outcome.map(|_| ())
        }
        Action::Move { building, gx, gz } => session.apply(Command::MoveBuilding {
            building: BuildingId::new(building),
            anchor: CellCoord::new(gx, gz),
        }),
        Action::Demolish { building } => session.apply(Command::DemolishBuilding {
            building: BuildingId::new(building),
        }),
        Action::Loan { offer } => {
            let Some(terms) = query::loan_offers(session.world()).get(offer).copied() else {
                return Err(Rejection::InvalidLoanTerms);
            };
            session.apply(Command::TakeLoan {
                principal: terms.principal,
                rate: terms.rate,
            })
        }
        Action::Reset => session.reset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_scenario_parses_in_time_order() {
        let scenario = Scenario::from_toml(STARTER).expect("starter parses");
        assert!(scenario.run_secs > 0.0);
        assert!(scenario
            .steps
            .windows(2)
            .all(|pair| pair[0].at_secs <= pair[1].at_secs));
    }

    #[test]
    fn actions_use_tagged_tables() {
        let scenario = Scenario::from_toml(
            r#"
            run_secs = 2

            [[steps]]
            at_secs = 1
            action = "loan"
            offer = 0

            [[steps]]
            action = "place"
            kind = "villa"
            gx = 0
            gz = 0
            "#,
        )
        .expect("parses");
        assert_eq!(scenario.frame_ms, DEFAULT_FRAME_MS);
        assert_eq!(
            scenario.steps[0].action,
            Action::Place {
                kind: BuildingKind::Villa,
                gx: 0,
                gz: 0
            }
        );
        assert_eq!(scenario.steps[1].action, Action::Loan { offer: 0 });
    }

    #[test]
    fn play_counts_rejections_and_runs_the_clock() {
        let scenario = Scenario::from_toml(
            r#"
            run_secs = 1.5

            [[steps]]
            action = "place"
            kind = "spa"
            gx = 0
            gz = 0

            [[steps]]
            at_secs = 0.5
            action = "loan"
            offer = 9
            "#,
        )
        .expect("parses");
        let mut session = Session::default();
        assert_eq!(scenario.play(&mut session), 2);
        assert_eq!(session.schedule().elapsed(), Duration::from_millis(1_500));
    }
}
