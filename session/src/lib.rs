#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-level driver that owns a [`World`] together with the systems that
//! react to it.
//!
//! The session turns elapsed time into timer ticks, pumps every event batch
//! through the guest router and the builder until no further commands are
//! produced, and keeps an ordered log of everything the world emitted.

mod timers;

use std::time::Duration;

use glam::Vec2;
use log::debug;
use resort_tycoon_core::{
    BuildingKind, Catalog, CellCoord, Command, Event, GuestId, Rejection, SimulationConfig,
    TimerKind,
};
use resort_tycoon_system_bootstrap::{Bootstrap, TutorialProgress};
use resort_tycoon_system_builder::{BuildTool, Builder, BuilderInput, PlacementPreview, RoadDrag};
use resort_tycoon_system_guests::{GuestRouter, RoutingView};
use resort_tycoon_world::{apply, query, World};

pub use timers::TimerSchedule;

/// Interactive simulation session.
#[derive(Debug)]
pub struct Session {
    world: World,
    schedule: TimerSchedule,
    router: GuestRouter,
    builder: Builder,
    bootstrap: Bootstrap,
    drag: Option<RoadDrag>,
    scenery_seed: u64,
    log: Vec<Event>,
}

impl Session {
    /// Starts a session on a fresh island.
    #[must_use]
    pub fn new(config: SimulationConfig, catalog: Catalog) -> Self {
        Self::from_world(World::with_config(config, catalog))
    }

    /// Wraps an existing world. Randomness is seeded from its configuration.
    #[must_use]
    pub fn from_world(world: World) -> Self {
        let config = query::config(&world);
        let seed = config.rng_seed;
        Self {
            schedule: TimerSchedule::new(&config.timers),
            router: GuestRouter::new(seed),
            builder: Builder::new(),
            bootstrap: Bootstrap,
            drag: None,
            scenery_seed: seed,
            log: Vec::new(),
            world,
        }
    }

    /// World driven by this session.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Timer bookkeeping.
    #[must_use]
    pub fn schedule(&self) -> &TimerSchedule {
        &self.schedule
    }

    /// Every event emitted since the log was last drained.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.log
    }

    /// Drains the event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    /// Banner to greet the player with.
    #[must_use]
    pub fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Onboarding checklist for the current island.
    #[must_use]
    pub fn tutorial(&self) -> TutorialProgress {
        self.bootstrap.tutorial(&self.world)
    }

    /// Applies a command and every follow-up the systems derive from it.
    ///
    /// Only the rejection of `command` itself is reported; follow-up commands
    /// that fail are logged and dropped.
    pub fn apply(&mut self, command: Command) -> Result<(), Rejection> {
        let mut pending = Vec::new();
        apply(&mut self.world, command, &mut pending)?;

        while !pending.is_empty() {
            self.observe(&pending);
            let commands = self.react(&pending);
            self.log.append(&mut pending);
            for command in commands {
                if let Err(rejection) = apply(&mut self.world, command, &mut pending) {
                    debug!("follow-up command rejected: {rejection}");
                }
            }
        }
        Ok(())
    }

    /// Advances simulated time, firing every timer that falls due.
    ///
    /// Returns the timers that fired. Ticks rejected because the resort is
    /// bankrupt are skipped.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerKind> {
        let fired = self.schedule.advance(dt);
        for timer in &fired {
            if let Err(rejection) = self.apply(Command::Tick { timer: *timer }) {
                debug!("{timer:?} tick skipped: {rejection}");
            }
        }
        fired
    }

    /// Restores the starting island and restarts every timer.
    pub fn reset(&mut self) -> Result<(), Rejection> {
        self.apply(Command::ResetGame)
    }

    /// Plants the seeded shoreline palms.
    pub fn seed_scenery(&mut self) -> Result<(), Rejection> {
        let command = self.bootstrap.scenery_command(&self.world, self.scenery_seed);
        self.apply(command)
    }

    /// Maps a world-space position onto the cell under it.
    #[must_use]
    pub fn pick(&self, position: Vec2) -> CellCoord {
        query::island(&self.world).mapper().world_to_grid(position)
    }

    /// World-space position of every walking guest.
    #[must_use]
    pub fn guest_positions(&self) -> Vec<(GuestId, Vec2)> {
        let mapper = query::island(&self.world).mapper();
        query::guests(&self.world)
            .into_iter()
            .map(|guest| (guest.id, mapper.grid_to_world(guest.cell)))
            .collect()
    }

    /// Tool currently selected.
    #[must_use]
    pub fn tool(&self) -> BuildTool {
        self.builder.tool()
    }

    /// Switches the active tool.
    pub fn select_tool(&mut self, tool: BuildTool) {
        self.builder.select_tool(tool);
    }

    /// Ghost shown under the cursor while the place tool is active.
    #[must_use]
    pub fn preview(&self, cursor: CellCoord) -> Option<PlacementPreview> {
        let BuildTool::Place(kind) = self.builder.tool() else {
            return None;
        };
        let region = query::footprint_region(&self.world, kind, cursor)?;
        let validation = match query::validate_placement(&self.world, kind, cursor) {
            Ok(()) => Ok(()),
            Err(Rejection::Placement(error)) => Err(error),
            Err(_) => return None,
        };
        Some(PlacementPreview::from_validation(kind, region, validation))
    }

    /// Feeds one frame of pointer input through the active tool.
    pub fn handle_input(&mut self, input: BuilderInput) {
        let preview = input.cursor_cell.and_then(|cell| self.preview(cell));
        let mut commands = Vec::new();
        let world = &self.world;
        self.builder.handle(
            &[],
            preview,
            input,
            |cell| query::building_at(world, cell),
            &mut commands,
        );
        for command in commands {
            if let Err(rejection) = self.apply(command) {
                debug!("tool action rejected: {rejection}");
            }
        }
    }

    /// Starts painting roads from `start`, placing the first road there.
    ///
    /// The gesture only begins if that first road is placed.
    pub fn begin_road_drag(&mut self, start: CellCoord) -> Result<(), Rejection> {
        self.drag = None;
        self.apply(Command::PlaceBuilding {
            kind: BuildingKind::Road,
            anchor: start,
        })?;
        self.drag = Some(RoadDrag::new(start));
        Ok(())
    }

    /// Extends the active road gesture towards `pointer`.
    ///
    /// Returns the number of roads placed by this step, or the rejection that
    /// ended the gesture. Occupied cells are skipped silently.
    pub fn extend_road_drag(&mut self, pointer: CellCoord) -> Result<usize, Rejection> {
        let Some(mut drag) = self.drag.take() else {
            return Ok(0);
        };
        let mut placed = 0;
        let mut stopped = None;
        for cell in drag.advance(pointer) {
            let outcome = self.apply(Command::PlaceBuilding {
                kind: BuildingKind::Road,
                anchor: cell,
            });
            if outcome.is_ok() {
                placed += 1;
            }
            if !drag.record(&outcome) {
                debug!("road drag stopped at {cell:?}");
                stopped = outcome.err();
                break;
            }
        }
        self.drag = Some(drag);
        stopped.map_or(Ok(placed), Err)
    }

    /// Finishes the road gesture and returns its final state.
    pub fn end_road_drag(&mut self) -> Option<RoadDrag> {
        self.drag.take()
    }

    /// Road gesture in progress, if any.
    #[must_use]
    pub fn road_drag(&self) -> Option<&RoadDrag> {
        self.drag.as_ref()
    }

    fn observe(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::GameReset { .. }))
        {
            self.schedule.reset();
            self.drag = None;
        }
        let mut ignored = Vec::new();
        self.builder.handle(
            events,
            None,
            BuilderInput::default(),
            |_| None,
            &mut ignored,
        );
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        let world = &self.world;
        let buildings = query::buildings(world);
        let view = RoutingView {
            economy_total: query::economy(world).report.total,
            active_guests: query::active_guests(world),
            max_guests: query::config(world).guests.max_active,
            buildings: &buildings,
            statuses: query::statuses(world),
            catalog: query::catalog(world),
            roads: query::road_cells(world),
        };
        let mut commands = Vec::new();
        self.router.handle(events, view, &mut commands);
        commands
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_world(World::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_tycoon_core::PlacementError;

    #[test]
    fn pick_rounds_to_the_nearest_cell() {
        let session = Session::default();
        assert_eq!(session.pick(Vec2::new(5.9, -2.1)), CellCoord::new(1, -1));
        assert_eq!(session.pick(Vec2::ZERO), CellCoord::new(0, 0));
    }

    #[test]
    fn place_tool_previews_and_builds() {
        let mut session = Session::default();
        assert_eq!(session.preview(CellCoord::new(0, 0)), None, "inspect shows nothing");

        session.select_tool(BuildTool::Place(BuildingKind::Villa));
        let preview = session.preview(CellCoord::new(0, 9)).expect("preview");
        assert!(!preview.placeable);
        assert_eq!(preview.rejection, Some(PlacementError::Unbuildable));

        session.handle_input(BuilderInput::new(true, false, Some(CellCoord::new(0, 0))));
        assert_eq!(query::buildings(session.world()).len(), 1);
        assert!(!session
            .preview(CellCoord::new(1, 1))
            .expect("preview")
            .placeable);
    }

    #[test]
    fn reset_returns_to_the_inspect_tool() {
        let mut session = Session::default();
        session.select_tool(BuildTool::Demolish);
        session.reset().expect("reset");
        assert_eq!(session.tool(), BuildTool::Inspect);
        assert_eq!(session.schedule().elapsed(), Duration::ZERO);
    }
}
