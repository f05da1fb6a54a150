#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system translating pointer input into building commands.
//!
//! [`Builder`] turns a confirmed pointer action into placement, move or
//! demolition commands depending on the selected [`BuildTool`]. [`RoadDrag`]
//! tracks a road-painting gesture, locking it to one axis and handing out
//! each cell along that axis exactly once.

use std::collections::BTreeSet;

use resort_tycoon_core::{
    BuildingId, BuildingKind, CellCoord, CellRect, Command, Event, PlacementError, Rejection,
};

/// Declarative placement preview describing a potential construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of building proposed for placement.
    pub kind: BuildingKind,
    /// Anchor cell of the proposed footprint.
    pub anchor: CellCoord,
    /// Region of cells that would be occupied if placed.
    pub region: CellRect,
    /// Indicates whether the preview represents a valid placement.
    pub placeable: bool,
    /// First validation failure when the preview is not placeable.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(
        kind: BuildingKind,
        anchor: CellCoord,
        region: CellRect,
        placeable: bool,
        rejection: Option<PlacementError>,
    ) -> Self {
        Self {
            kind,
            anchor,
            region,
            placeable,
            rejection,
        }
    }

    /// Builds a preview from the outcome of placement validation.
    #[must_use]
    pub fn from_validation(
        kind: BuildingKind,
        region: CellRect,
        validation: Result<(), PlacementError>,
    ) -> Self {
        Self::new(
            kind,
            region.anchor(),
            region,
            validation.is_ok(),
            validation.err(),
        )
    }
}

/// Tool currently selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BuildTool {
    /// Pointer actions do nothing.
    #[default]
    Inspect,
    /// Confirming places the selected catalog item.
    Place(BuildingKind),
    /// The first confirm picks a building, the second drops it on the cursor.
    Move,
    /// Confirming demolishes the building under the cursor.
    Demolish,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player confirmed an action on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player cancelled the pending action.
    pub cancel_action: bool,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        confirm_action: bool,
        cancel_action: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            confirm_action,
            cancel_action,
            cursor_cell,
        }
    }
}

/// Builder system that translates preview + input into building commands.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    tool: BuildTool,
    carried: Option<BuildingId>,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tool: BuildTool::Inspect,
            carried: None,
        }
    }

    /// Tool currently selected.
    #[must_use]
    pub const fn tool(&self) -> BuildTool {
        self.tool
    }

    /// Building picked up by the move tool, if any.
    #[must_use]
    pub const fn carried(&self) -> Option<BuildingId> {
        self.carried
    }

    /// Switches tools, dropping any building picked up for a move.
    pub fn select_tool(&mut self, tool: BuildTool) {
        self.tool = tool;
        self.carried = None;
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `building_at` closure should mirror the semantics of the world's
    /// `query::building_at` helper so the system can identify the hovered building.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        mut building_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<BuildingId>,
    {
        for event in events {
            match event {
                Event::GameReset { .. } => self.select_tool(BuildTool::Inspect),
                Event::BuildingDemolished { building, .. } if self.carried == Some(*building) => {
                    self.carried = None;
                }
                _ => {}
            }
        }

        if input.cancel_action {
            self.carried = None;
            return;
        }
        if !input.confirm_action {
            return;
        }

        match self.tool {
            BuildTool::Inspect => {}
            BuildTool::Place(kind) => {
                if let Some(preview) = preview {
                    if preview.placeable && preview.kind == kind {
                        out.push(Command::PlaceBuilding {
                            kind,
                            anchor: preview.anchor,
                        });
                    }
                }
            }
            BuildTool::Move => {
                let Some(cell) = input.cursor_cell else {
                    return;
                };
                match self.carried.take() {
                    Some(building) => out.push(Command::MoveBuilding {
                        building,
                        anchor: cell,
                    }),
                    None => self.carried = building_at(cell),
                }
            }
            BuildTool::Demolish => {
                if let Some(building) = input.cursor_cell.and_then(&mut building_at) {
                    out.push(Command::DemolishBuilding { building });
                }
            }
        }
    }
}

/// Axis a road drag is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragAxis {
    /// Cells share the start's `gz`.
    X,
    /// Cells share the start's `gx`.
    Z,
}

/// Road-painting gesture state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadDrag {
    start: CellCoord,
    axis: Option<DragAxis>,
    attempted: BTreeSet<CellCoord>,
    aborted: bool,
}

impl RoadDrag {
    /// Starts a gesture whose first road was placed on `start`.
    #[must_use]
    pub fn new(start: CellCoord) -> Self {
        let mut attempted = BTreeSet::new();
        let _ = attempted.insert(start);
        Self {
            start,
            axis: None,
            attempted,
            aborted: false,
        }
    }

    /// Cell the gesture started on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Axis the gesture is locked to once the pointer has left the start.
    #[must_use]
    pub const fn axis(&self) -> Option<DragAxis> {
        self.axis
    }

    /// Reports whether a rejection ended the gesture early.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Cells already handed out, start included.
    #[must_use]
    pub fn attempted(&self) -> &BTreeSet<CellCoord> {
        &self.attempted
    }

    /// Cells to attempt for a pointer over `pointer`, nearest to the start first.
    ///
    /// Each returned cell is recorded and never returned again.
    pub fn advance(&mut self, pointer: CellCoord) -> Vec<CellCoord> {
        if self.aborted || pointer == self.start {
            return Vec::new();
        }

        let dx = pointer.gx() - self.start.gx();
        let dz = pointer.gz() - self.start.gz();
        let axis = *self.axis.get_or_insert(if dx.abs() >= dz.abs() {
            DragAxis::X
        } else {
            DragAxis::Z
        });
        let (span, step) = match axis {
            DragAxis::X => (dx, (dx.signum(), 0)),
            DragAxis::Z => (dz, (0, dz.signum())),
        };

        let mut pending = Vec::new();
        for distance in 1..=span.abs() {
            let cell = self
                .start
                .offset(step.0.saturating_mul(distance), step.1.saturating_mul(distance));
            if self.attempted.insert(cell) {
                pending.push(cell);
            }
        }
        pending
    }

    /// Records the outcome of placing a handed-out cell.
    ///
    /// Occupied tiles are skipped; any other rejection ends the gesture.
    /// Returns whether the gesture continues.
    pub fn record(&mut self, outcome: &Result<(), Rejection>) -> bool {
        match outcome {
            Ok(()) | Err(Rejection::Placement(PlacementError::TileOccupied)) => {}
            Err(_) => self.aborted = true,
        }
        !self.aborted
    }
}
