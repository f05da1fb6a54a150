//! Walking guests and their out-and-back lifecycle.

use std::collections::BTreeMap;

use resort_tycoon_core::{BuildingId, CellCoord, Event, GuestId};
use serde::{Deserialize, Serialize};

/// Leg of the trip a guest is walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestPhase {
    /// Walking from the villa towards the destination.
    Outbound,
    /// Walking back to the villa.
    Returning,
}

/// Read-only description of a walking guest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestView {
    /// Identifier of the guest.
    pub id: GuestId,
    /// Villa the guest came from.
    pub origin: BuildingId,
    /// Building the guest visits.
    pub destination: BuildingId,
    /// Outbound road path; the return leg walks it backwards.
    pub path: Vec<CellCoord>,
    /// Current leg.
    pub phase: GuestPhase,
    /// Cell the guest stands on.
    pub cell: CellCoord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Guest {
    origin: BuildingId,
    destination: BuildingId,
    path: Vec<CellCoord>,
    phase: GuestPhase,
    index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GuestRoster {
    guests: BTreeMap<GuestId, Guest>,
    next_guest_id: GuestId,
}

impl GuestRoster {
    pub(crate) fn new() -> Self {
        Self {
            guests: BTreeMap::new(),
            next_guest_id: GuestId::new(0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.guests.len()
    }

    pub(crate) fn spawn(
        &mut self,
        origin: BuildingId,
        destination: BuildingId,
        path: Vec<CellCoord>,
    ) -> GuestId {
        let id = self.next_guest_id;
        self.next_guest_id = GuestId::new(id.get().saturating_add(1));
        let _ = self.guests.insert(
            id,
            Guest {
                origin,
                destination,
                path,
                phase: GuestPhase::Outbound,
                index: 0,
            },
        );
        id
    }

    /// Moves every guest one cell along its current leg.
    pub(crate) fn step(&mut self, out_events: &mut Vec<Event>) {
        let mut departed = Vec::new();
        for (id, guest) in &mut self.guests {
            let last = guest.path.len().saturating_sub(1);
            match guest.phase {
                GuestPhase::Outbound => {
                    if guest.index < last {
                        guest.index += 1;
                        out_events.push(Event::GuestAdvanced {
                            guest: *id,
                            cell: guest.path[guest.index],
                        });
                    }
                    if guest.index >= last {
                        guest.phase = GuestPhase::Returning;
                        out_events.push(Event::GuestArrived {
                            guest: *id,
                            destination: guest.destination,
                        });
                    }
                }
                GuestPhase::Returning => {
                    if guest.index > 0 {
                        guest.index -= 1;
                        out_events.push(Event::GuestAdvanced {
                            guest: *id,
                            cell: guest.path[guest.index],
                        });
                    } else {
                        departed.push(*id);
                    }
                }
            }
        }
        for id in departed {
            let _ = self.guests.remove(&id);
            out_events.push(Event::GuestDeparted { guest: id });
        }
    }

    pub(crate) fn views(&self) -> Vec<GuestView> {
        self.guests
            .iter()
            .map(|(id, guest)| GuestView {
                id: *id,
                origin: guest.origin,
                destination: guest.destination,
                path: guest.path.clone(),
                phase: guest.phase,
                cell: guest.path[guest.index.min(guest.path.len().saturating_sub(1))],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(roster: &mut GuestRoster) -> Vec<Event> {
        let mut events = Vec::new();
        roster.step(&mut events);
        events
    }

    #[test]
    fn guest_walks_out_and_back() {
        let mut roster = GuestRoster::new();
        let path = vec![CellCoord::new(0, 0), CellCoord::new(1, 0), CellCoord::new(2, 0)];
        let guest = roster.spawn(BuildingId::new(0), BuildingId::new(1), path);

        assert_eq!(
            walk(&mut roster),
            vec![Event::GuestAdvanced {
                guest,
                cell: CellCoord::new(1, 0)
            }]
        );
        assert_eq!(
            walk(&mut roster),
            vec![
                Event::GuestAdvanced {
                    guest,
                    cell: CellCoord::new(2, 0)
                },
                Event::GuestArrived {
                    guest,
                    destination: BuildingId::new(1)
                },
            ]
        );
        assert_eq!(roster.views()[0].phase, GuestPhase::Returning);
        let _ = walk(&mut roster);
        let _ = walk(&mut roster);
        assert_eq!(roster.views()[0].cell, CellCoord::new(0, 0));
        assert_eq!(walk(&mut roster), vec![Event::GuestDeparted { guest }]);
        assert_eq!(roster.len(), 0);
    }

    #[test]
    fn single_cell_trip_arrives_then_departs() {
        let mut roster = GuestRoster::new();
        let guest = roster.spawn(
            BuildingId::new(0),
            BuildingId::new(1),
            vec![CellCoord::new(4, 4)],
        );
        assert_eq!(
            walk(&mut roster),
            vec![Event::GuestArrived {
                guest,
                destination: BuildingId::new(1)
            }]
        );
        assert_eq!(walk(&mut roster), vec![Event::GuestDeparted { guest }]);
    }
}
