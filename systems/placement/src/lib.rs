#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command grids and the system that turns them into placement commands.
//!
//! A command grid mirrors the layout cell for cell. Each token lists the
//! directives for one tile, top floor first, with `.` marking an empty slot.

mod grid;

use kaiju_cats_core::{CellCoord, Command, CommandKind, Event, PlacementError};
use kaiju_cats_world::{self as world, query, World};
use log::warn;

pub use grid::{CommandGrid, CommandGridError};

/// Placement request the world refused, or that did not fit the tile's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Cell named by the request.
    pub cell: CellCoord,
    /// Floor named by the request.
    pub floor: u8,
    /// Directive that was refused.
    pub kind: CommandKind,
    /// Reason for the refusal.
    pub reason: PlacementError,
}

/// Pure system that emits placement commands for a command grid and records
/// the ones that fail.
#[derive(Debug, Default)]
pub struct Placement {
    rejections: Vec<Rejection>,
}

impl Placement {
    /// Creates a placement system with no recorded rejections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one placement command per directive in `grid`.
    ///
    /// `command_slots` reports how many floor slots the tile at a cell
    /// exposes. Tokens that list a different number of slots are rejected
    /// here instead of being sent to the world.
    pub fn handle<F>(&mut self, grid: &CommandGrid, command_slots: F, out: &mut Vec<Command>)
    where
        F: Fn(CellCoord) -> u8,
    {
        for entry in grid.entries() {
            let slots = command_slots(entry.cell);
            let shape_error = match slots {
                0 => Some(PlacementError::NotCommandable),
                slots if slots != entry.slot_count() => Some(PlacementError::InvalidFloor),
                _ => None,
            };

            for (floor, kind) in entry.directives() {
                match shape_error {
                    Some(reason) => self.reject(Rejection {
                        cell: entry.cell,
                        floor,
                        kind,
                        reason,
                    }),
                    None => out.push(Command::PlaceCommand {
                        cell: entry.cell,
                        kind,
                        floor,
                    }),
                }
            }
        }
    }

    /// Records rejections reported by the world.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::CommandRejected {
                cell,
                floor,
                kind,
                reason,
            } = *event
            {
                self.reject(Rejection {
                    cell,
                    floor,
                    kind,
                    reason,
                });
            }
        }
    }

    /// Rejections recorded so far, in the order they happened.
    #[must_use]
    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Consumes the system, yielding the recorded rejections.
    #[must_use]
    pub fn into_rejections(self) -> Vec<Rejection> {
        self.rejections
    }

    fn reject(&mut self, rejection: Rejection) {
        warn!(
            "{:?} on floor {} at {} rejected: {}",
            rejection.kind, rejection.floor, rejection.cell, rejection.reason
        );
        self.rejections.push(rejection);
    }
}

/// Places every directive of `grid` on the world, returning what was refused.
pub fn place_grid(world: &mut World, grid: &CommandGrid) -> Vec<Rejection> {
    let mut placement = Placement::new();
    let mut commands = Vec::new();
    placement.handle(grid, |cell| query::command_slots(world, cell), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    placement.observe(&events);
    placement.into_rejections()
}
