//! Turn resolution: planning, movement, combat and tile effects.
//!
//! Every phase finishes for all cats before the next one starts. Movement and
//! effects run in ascending power order, ties keeping roster order.

use std::cmp::Reverse;

use kaiju_cats_core::{CatStatus, CellCoord, CommandKind, Event};
use log::trace;

use crate::{cats::Cat, tiles::Tile, World};

/// Buffers reused across turns so resolution does not allocate.
#[derive(Clone, Debug, Default)]
pub(crate) struct TurnScratch {
    movers: Vec<Mover>,
    landings: Vec<(CellCoord, usize)>,
}

#[derive(Clone, Copy, Debug)]
struct Mover {
    cat: usize,
    moved: bool,
}

impl World {
    pub(crate) fn advance_turn(&mut self, out_events: &mut Vec<Event>) {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.movers.clear();
        scratch.landings.clear();

        self.plan_moves(&mut scratch.movers, out_events);
        self.resolve_movement(&mut scratch, out_events);
        self.resolve_combat(&mut scratch.landings, out_events);
        for mover in &scratch.movers {
            if mover.moved && self.cats[mover.cat].status() != CatStatus::Defeated {
                self.apply_tile_effect(mover.cat, out_events);
            }
        }
        self.scratch = scratch;

        self.turn = self.turn.saturating_add(1);
        out_events.push(Event::TurnAdvanced { turn: self.turn });
        if self.cats.iter().all(|cat| cat.status().is_terminal()) {
            out_events.push(Event::AllCatsSettled { turn: self.turn });
        }
    }

    fn plan_moves(&mut self, movers: &mut Vec<Mover>, out_events: &mut Vec<Event>) {
        for index in 0..self.cats.len() {
            let cat = &mut self.cats[index];
            match cat.status() {
                CatStatus::Active => movers.push(Mover {
                    cat: index,
                    moved: false,
                }),
                CatStatus::StuckInMud => {
                    cat.transition(CatStatus::Active);
                    out_events.push(Event::CatUnstuck { color: cat.color });
                }
                CatStatus::Stomping => {
                    cat.transition(CatStatus::Active);
                    trace!("{} stomps again at {}", cat.color, cat.cell);
                    self.apply_tile_effect(index, out_events);
                }
                CatStatus::Finished | CatStatus::Defeated => {}
            }
        }
    }

    fn resolve_movement(&mut self, scratch: &mut TurnScratch, out_events: &mut Vec<Event>) {
        let cats = &self.cats;
        scratch.movers.sort_by_key(|mover| cats[mover.cat].power());

        for mover in &mut scratch.movers {
            let cat = &mut self.cats[mover.cat];
            let from = cat.cell;
            let target = from
                .step(cat.direction)
                .filter(|cell| self.grid.get(*cell).is_some_and(Tile::is_passable));

            match target {
                Some(to) => {
                    cat.cell = to;
                    mover.moved = true;
                    out_events.push(Event::CatMoved {
                        color: cat.color,
                        from,
                        to,
                    });
                }
                None => {
                    cat.rebound();
                    out_events.push(Event::CatRebounded {
                        color: cat.color,
                        cell: from,
                        direction: cat.direction,
                    });
                }
            }
            scratch.landings.push((cat.cell, mover.cat));
        }
    }

    fn resolve_combat(&mut self, landings: &mut [(CellCoord, usize)], out_events: &mut Vec<Event>) {
        landings.sort_by_key(|(cell, _)| *cell);

        for group in landings.chunk_by(|a, b| a.0 == b.0) {
            if group.len() < 2 {
                continue;
            }
            let cats = &self.cats;
            let Some(&(cell, winner)) = group
                .iter()
                .max_by_key(|(_, index)| (cats[*index].power(), Reverse(cats[*index].hierarchy)))
            else {
                continue;
            };
            let winner_color = self.cats[winner].color;

            for &(_, loser) in group.iter().filter(|(_, index)| *index != winner) {
                let cat = &mut self.cats[loser];
                cat.transition(CatStatus::Defeated);
                trace!("{} loses to {} at {}", cat.color, winner_color, cell);
                out_events.push(Event::CatDefeated {
                    color: cat.color,
                    cell,
                    winner: winner_color,
                });
            }
        }
    }

    fn apply_tile_effect(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let cat = &mut self.cats[index];
        let cell = cat.cell;
        let color = cat.color;
        let Some(tile) = self.grid.get_mut(cell) else {
            unreachable!("{color} stands outside the grid at {cell}");
        };

        match tile {
            Tile::Mud => {
                cat.transition(CatStatus::StuckInMud);
                out_events.push(Event::CatStuck { color, cell });
            }
            Tile::SpikeTrap => {
                cat.halve_power();
                out_events.push(Event::CatSpiked {
                    color,
                    cell,
                    power: cat.power(),
                });
            }
            Tile::Building(building) => {
                let Some(demolition) = building.demolish_floor() else {
                    return;
                };
                cat.add_power(demolition.power);
                out_events.push(Event::FloorDestroyed {
                    color,
                    cell,
                    remaining_floors: demolition.remaining_floors,
                    power_gained: demolition.power,
                });
                if let Some(kind) = demolition.command {
                    if kind == CommandKind::Stomp && demolition.remaining_floors > 0 {
                        cat.transition(CatStatus::Stomping);
                    }
                    execute_command(cat, cell, kind, self.rules.powerup_bonus, out_events);
                }
            }
            Tile::PowerSource(source) => {
                let Some(command) = source.drain() else {
                    return;
                };
                cat.multiply_power(self.rules.power_source_multiplier);
                out_events.push(Event::PowerSourceDrained {
                    color,
                    cell,
                    power: cat.power(),
                });
                if let Some(kind) = command {
                    execute_command(cat, cell, kind, self.rules.powerup_bonus, out_events);
                }
            }
            Tile::Bed(owner) if *owner == color => {
                self.arrivals = self.arrivals.saturating_add(1);
                cat.transition(CatStatus::Finished);
                if let Some(bonus) = self.rules.arrival_bonus(self.arrivals) {
                    cat.set_power(bonus.apply(cat.power()));
                }
                out_events.push(Event::CatFinished {
                    color,
                    cell,
                    arrival: self.arrivals,
                    power: cat.power(),
                });
            }
            Tile::Empty | Tile::Wall | Tile::Boulder | Tile::Bed(_) => {}
        }
    }
}

// Stomp is left to the caller; only buildings honour it.
fn execute_command(
    cat: &mut Cat,
    cell: CellCoord,
    kind: CommandKind,
    powerup_bonus: u64,
    out_events: &mut Vec<Event>,
) {
    if let Some(direction) = kind.heading() {
        cat.direction = direction;
    }
    if kind == CommandKind::Powerup {
        cat.add_power(powerup_bonus);
    }
    trace!("{} executes {:?} at {}", cat.color, kind, cell);
    out_events.push(Event::CommandExecuted {
        color: cat.color,
        cell,
        kind,
    });
}
