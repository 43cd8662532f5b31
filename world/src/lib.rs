#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Kaiju Cats.
//!
//! The world owns the board, the cats and the placement budget. It is only
//! mutated through [`apply`], which reports every observable change as an
//! [`Event`]. Read access goes through the [`query`] module.

mod cats;
mod config;
mod layout;
mod ledger;
mod tiles;
mod turn;

use kaiju_cats_core::{CatColor, CellCoord, Command, CommandKind, Event, PlacementError};
use log::debug;

use crate::{cats::Cat, ledger::BudgetLedger, tiles::Grid, turn::TurnScratch};

pub use config::{RosterEntry, Rules, WorldConfig, DEFAULT_BUDGET};
pub use layout::LayoutError;

/// Represents the authoritative Kaiju Cats world state.
///
/// Cloning produces a fully independent world, so a layout can be parsed once
/// and evaluated against many command sets.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    // Sorted by hierarchy rank.
    cats: Vec<Cat>,
    beds: Vec<(CatColor, CellCoord)>,
    ledger: BudgetLedger,
    rules: Rules,
    turn: u32,
    arrivals: u32,
    scratch: TurnScratch,
}

impl World {
    /// Builds a world from layout text and the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the layout is malformed or does not
    /// agree with the configured roster.
    pub fn from_layout(layout: &str, config: &WorldConfig) -> Result<Self, LayoutError> {
        let layout = layout::parse(layout, config)?;

        let mut cats: Vec<Cat> = layout
            .starts
            .iter()
            .filter_map(|(color, cell)| {
                config
                    .roster_entry(*color)
                    .map(|entry| Cat::spawn(entry, *cell))
            })
            .collect();
        cats.sort_by_key(|cat| (cat.hierarchy, cat.color));

        let (columns, rows) = layout.grid.dimensions();
        debug!(
            "built {columns}x{rows} world with {} cats and budget {}",
            cats.len(),
            config.budget
        );

        Ok(Self {
            grid: layout.grid,
            cats,
            beds: layout.beds.into_iter().collect(),
            ledger: BudgetLedger::new(config.budget),
            rules: config.rules.clone(),
            turn: 0,
            arrivals: 0,
            scratch: TurnScratch::default(),
        })
    }

    /// Attaches a directive to a tile floor, reporting whether it was accepted.
    pub fn place_command(&mut self, cell: CellCoord, kind: CommandKind, floor: u8) -> bool {
        self.try_place_command(cell, kind, floor).is_ok()
    }

    /// Attaches a directive to the ground floor, the only floor of single-floor
    /// tiles, reporting whether it was accepted.
    pub fn place_ground_command(&mut self, cell: CellCoord, kind: CommandKind) -> bool {
        self.place_command(cell, kind, 0)
    }

    /// Attaches a directive to a tile floor.
    ///
    /// A directive already attached to the floor is replaced and its cost
    /// refunded.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in order: the cell lies outside the
    /// grid, the tile cannot hold commands, the floor does not exist, or the
    /// budget would be exceeded. Rejections leave the world untouched.
    pub fn try_place_command(
        &mut self,
        cell: CellCoord,
        kind: CommandKind,
        floor: u8,
    ) -> Result<Placement, PlacementError> {
        let tile = self
            .grid
            .get_mut(cell)
            .ok_or(PlacementError::OutOfBounds)?;
        let replaced = tile.command_on(floor)?;
        self.ledger
            .replace(replaced.map_or(0, CommandKind::cost), kind.cost())?;
        tile.attach(kind, floor);

        Ok(Placement {
            replaced,
            remaining_budget: self.ledger.remaining(),
        })
    }
}

/// Outcome of an accepted placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Directive that previously occupied the floor.
    pub replaced: Option<CommandKind>,
    /// Budget left after the placement.
    pub remaining_budget: u32,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceCommand { cell, kind, floor } => {
            match world.try_place_command(cell, kind, floor) {
                Ok(placement) => out_events.push(Event::CommandPlaced {
                    cell,
                    floor,
                    kind,
                    replaced: placement.replaced,
                    remaining_budget: placement.remaining_budget,
                }),
                Err(reason) => out_events.push(Event::CommandRejected {
                    cell,
                    floor,
                    kind,
                    reason,
                }),
            }
        }
        Command::AdvanceTurn => world.advance_turn(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use kaiju_cats_core::{
        CatColor, CatSnapshot, CatStatus, CatView, CellCoord, PlacedCommand, TileKind,
    };

    use super::World;

    /// Captures a read-only view of every cat in hierarchy order.
    #[must_use]
    pub fn cat_view(world: &World) -> CatView {
        CatView::from_snapshots(world.cats.iter().map(|cat| cat.snapshot()).collect())
    }

    /// Snapshot of a single cat.
    #[must_use]
    pub fn cat(world: &World, color: CatColor) -> Option<CatSnapshot> {
        world
            .cats
            .iter()
            .find(|cat| cat.color == color)
            .map(|cat| cat.snapshot())
    }

    /// Describes the tile at the provided cell.
    #[must_use]
    pub fn tile_kind(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.grid.get(cell).map(|tile| tile.kind())
    }

    /// Number of floor slots a command grid addresses on the tile, zero for
    /// tiles that never hold commands.
    #[must_use]
    pub fn command_slots(world: &World, cell: CellCoord) -> u8 {
        world.grid.get(cell).map_or(0, |tile| tile.command_slots())
    }

    /// Grid size as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Cell of the bed belonging to the provided cat.
    #[must_use]
    pub fn bed_cell(world: &World, color: CatColor) -> Option<CellCoord> {
        world
            .beds
            .iter()
            .find(|(owner, _)| *owner == color)
            .map(|(_, cell)| *cell)
    }

    /// Number of turns resolved so far.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Number of cats that reached their bed so far.
    #[must_use]
    pub fn arrivals(world: &World) -> u32 {
        world.arrivals
    }

    /// Budget the world was built with.
    #[must_use]
    pub fn budget_total(world: &World) -> u32 {
        world.ledger.total()
    }

    /// Budget consumed by the directives currently attached.
    #[must_use]
    pub fn budget_spent(world: &World) -> u32 {
        world.ledger.spent()
    }

    /// Budget still available for placements.
    #[must_use]
    pub fn budget_remaining(world: &World) -> u32 {
        world.ledger.remaining()
    }

    /// Every directive still attached to a standing floor, in row-major order.
    #[must_use]
    pub fn placed_commands(world: &World) -> Vec<PlacedCommand> {
        world
            .grid
            .cells()
            .flat_map(|(cell, tile)| {
                tile.attached_commands()
                    .map(move |(floor, kind)| PlacedCommand { cell, floor, kind })
            })
            .collect()
    }

    /// Sum of power over every cat that was not defeated.
    #[must_use]
    pub fn final_score(world: &World) -> u64 {
        world
            .cats
            .iter()
            .filter(|cat| cat.status() != CatStatus::Defeated)
            .fold(0u64, |score, cat| score.saturating_add(cat.power()))
    }

    /// Reports whether every cat is finished or defeated.
    #[must_use]
    pub fn is_settled(world: &World) -> bool {
        world.cats.iter().all(|cat| cat.status().is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use kaiju_cats_core::{CatStatus, Direction, PlacedCommand, TileKind};

    use super::*;

    fn world(layout: &str) -> World {
        World::from_layout(layout, &WorldConfig::default()).expect("layout parses")
    }

    fn advance(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::AdvanceTurn, &mut events);
        events
    }

    #[test]
    fn cats_spawn_in_hierarchy_order_facing_east() {
        let world = world("BStart RStart GStart\nRBed GBed BBed");
        let view = query::cat_view(&world);
        let order: Vec<_> = view.iter().map(|cat| cat.color).collect();
        assert_eq!(order, vec![CatColor::RED, CatColor::GREEN, CatColor::BLUE]);
        assert!(view.iter().all(|cat| cat.direction == Direction::East));
        assert!(view.iter().all(|cat| cat.power == 0));
        assert_eq!(query::bed_cell(&world, CatColor::BLUE), Some(CellCoord::new(2, 1)));
        assert_eq!(query::tile_kind(&world, CellCoord::new(0, 0)), Some(TileKind::Empty));
    }

    #[test]
    fn placement_checks_run_in_order() {
        let mut world = world("RStart h P M RBed");
        let outside = CellCoord::new(9, 0);

        assert_eq!(
            world.try_place_command(outside, CommandKind::Stomp, 5),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            world.try_place_command(CellCoord::new(3, 0), CommandKind::Stomp, 5),
            Err(PlacementError::NotCommandable)
        );
        assert_eq!(
            world.try_place_command(CellCoord::new(1, 0), CommandKind::Stomp, 1),
            Err(PlacementError::InvalidFloor)
        );
        assert_eq!(query::budget_spent(&world), 0);
    }

    #[test]
    fn replacing_a_directive_refunds_its_cost() {
        let mut world = world("RStart P RBed");
        let source = CellCoord::new(1, 0);

        let first = world
            .try_place_command(source, CommandKind::Powerup, 0)
            .expect("powerup fits");
        assert_eq!(first.replaced, None);
        assert_eq!(first.remaining_budget, 170);

        let second = world
            .try_place_command(source, CommandKind::TurnSouth, 0)
            .expect("turn fits");
        assert_eq!(second.replaced, Some(CommandKind::Powerup));
        assert_eq!(query::budget_spent(&world), 10);
        assert_eq!(query::placed_commands(&world).len(), 1);
    }

    #[test]
    fn ground_placement_targets_floor_zero() {
        let mut world = world("RStart hh P RBed");
        let building = CellCoord::new(1, 0);

        assert!(world.place_ground_command(CellCoord::new(2, 0), CommandKind::Powerup));
        assert!(world.place_ground_command(building, CommandKind::Stomp));
        assert_eq!(
            query::placed_commands(&world),
            vec![
                PlacedCommand {
                    cell: building,
                    floor: 0,
                    kind: CommandKind::Stomp,
                },
                PlacedCommand {
                    cell: CellCoord::new(2, 0),
                    floor: 0,
                    kind: CommandKind::Powerup,
                },
            ]
        );
        assert!(!world.place_ground_command(CellCoord::new(0, 0), CommandKind::Stomp));
        assert_eq!(query::budget_spent(&world), 50);
    }

    #[test]
    fn budget_rejection_reports_through_events() {
        let config = WorldConfig {
            budget: 25,
            ..WorldConfig::default()
        };
        let mut world = World::from_layout("RStart h P RBed", &config).expect("layout parses");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceCommand {
                cell: CellCoord::new(1, 0),
                kind: CommandKind::Stomp,
                floor: 0,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceCommand {
                cell: CellCoord::new(2, 0),
                kind: CommandKind::TurnNorth,
                floor: 0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::CommandPlaced {
                    cell: CellCoord::new(1, 0),
                    floor: 0,
                    kind: CommandKind::Stomp,
                    replaced: None,
                    remaining_budget: 5,
                },
                Event::CommandRejected {
                    cell: CellCoord::new(2, 0),
                    floor: 0,
                    kind: CommandKind::TurnNorth,
                    reason: PlacementError::OverBudget,
                },
            ]
        );
        assert!(!world.place_command(CellCoord::new(2, 0), CommandKind::TurnNorth, 0));
    }

    #[test]
    fn cat_rebounds_off_walls_without_effects() {
        let mut world = world("RStart #\nRBed .");
        let events = advance(&mut world);
        assert_eq!(
            events[0],
            Event::CatRebounded {
                color: CatColor::RED,
                cell: CellCoord::new(0, 0),
                direction: Direction::West,
            }
        );
        assert_eq!(events[1], Event::TurnAdvanced { turn: 1 });

        let events = advance(&mut world);
        assert!(matches!(events[0], Event::CatRebounded { direction: Direction::East, .. }));
    }

    #[test]
    fn mud_holds_a_cat_for_one_turn() {
        let mut world = world("RStart M . RBed");
        let _ = advance(&mut world);
        assert_eq!(
            query::cat(&world, CatColor::RED).map(|cat| cat.status),
            Some(CatStatus::StuckInMud)
        );

        let events = advance(&mut world);
        assert_eq!(events[0], Event::CatUnstuck { color: CatColor::RED });
        assert_eq!(
            query::cat(&world, CatColor::RED).map(|cat| cat.cell),
            Some(CellCoord::new(1, 0))
        );

        let _ = advance(&mut world);
        assert_eq!(
            query::cat(&world, CatColor::RED).map(|cat| cat.cell),
            Some(CellCoord::new(2, 0))
        );
    }

    #[test]
    fn settled_world_announces_it() {
        let mut world = world("RStart RBed");
        let events = advance(&mut world);
        assert_eq!(events.last(), Some(&Event::AllCatsSettled { turn: 1 }));
        assert!(query::is_settled(&world));
        assert_eq!(query::arrivals(&world), 1);
        assert_eq!(query::final_score(&world), 2000);
    }
}
