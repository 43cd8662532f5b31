#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Kaiju Cats engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Attaches a directive to one floor of a commandable tile.
    PlaceCommand {
        /// Cell holding the tile that receives the directive.
        cell: CellCoord,
        /// Directive to attach.
        kind: CommandKind,
        /// Floor slot on the tile. Single-floor tiles only accept floor zero.
        floor: u8,
    },
    /// Resolves one full simulation turn.
    AdvanceTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a directive was attached to a tile floor.
    CommandPlaced {
        /// Cell holding the commanded tile.
        cell: CellCoord,
        /// Floor that received the directive.
        floor: u8,
        /// Directive that was attached.
        kind: CommandKind,
        /// Directive previously attached to the floor, refunded on replacement.
        replaced: Option<CommandKind>,
        /// Budget left after the placement.
        remaining_budget: u32,
    },
    /// Reports that a placement request was rejected without side effects.
    CommandRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Floor provided in the placement request.
        floor: u8,
        /// Directive requested for placement.
        kind: CommandKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// A cat that skipped its move in the mud is free to walk again.
    CatUnstuck {
        /// Cat leaving the mud.
        color: CatColor,
    },
    /// Confirms that a cat walked between two cells.
    CatMoved {
        /// Cat that moved.
        color: CatColor,
        /// Cell the cat occupied before moving.
        from: CellCoord,
        /// Cell the cat occupies after moving.
        to: CellCoord,
    },
    /// A cat bounced off an obstacle or the grid edge and turned around.
    CatRebounded {
        /// Cat that rebounded.
        color: CatColor,
        /// Cell the cat stayed on.
        cell: CellCoord,
        /// Heading after the reversal.
        direction: Direction,
    },
    /// A cat lost a fight for a contested cell.
    CatDefeated {
        /// Cat that was defeated.
        color: CatColor,
        /// Contested cell.
        cell: CellCoord,
        /// Cat that won the fight.
        winner: CatColor,
    },
    /// A building floor was flattened and its power absorbed.
    FloorDestroyed {
        /// Cat responsible for the destruction.
        color: CatColor,
        /// Cell of the building.
        cell: CellCoord,
        /// Floors left standing afterwards.
        remaining_floors: u8,
        /// Power granted to the cat.
        power_gained: u64,
    },
    /// A power source multiplied a cat's power and was used up.
    PowerSourceDrained {
        /// Cat that drained the source.
        color: CatColor,
        /// Cell of the power source.
        cell: CellCoord,
        /// Cat power after the multiplication.
        power: u64,
    },
    /// A directive attached to a tile took effect on a cat.
    CommandExecuted {
        /// Cat receiving the directive.
        color: CatColor,
        /// Cell of the commanded tile.
        cell: CellCoord,
        /// Directive that executed.
        kind: CommandKind,
    },
    /// A cat sank into mud and will skip its next move.
    CatStuck {
        /// Cat that got stuck.
        color: CatColor,
        /// Cell of the mud tile.
        cell: CellCoord,
    },
    /// A spike trap halved a cat's power.
    CatSpiked {
        /// Cat that was hurt.
        color: CatColor,
        /// Cell of the trap.
        cell: CellCoord,
        /// Cat power after halving.
        power: u64,
    },
    /// A cat curled up in its own bed.
    CatFinished {
        /// Cat that finished.
        color: CatColor,
        /// Cell of the bed.
        cell: CellCoord,
        /// One-based global arrival order.
        arrival: u32,
        /// Cat power after the arrival bonus.
        power: u64,
    },
    /// Announces that a turn completed.
    TurnAdvanced {
        /// Number of turns resolved so far.
        turn: u32,
    },
    /// Every cat is finished or defeated; further turns change nothing.
    AllCatsSettled {
        /// Turn on which the last cat settled.
        turn: u32,
    },
}

/// Cardinal headings available to cats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices. Cats start out facing east.
    #[default]
    East,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Heading pointing the other way, used when a cat rebounds.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Unit vector of the heading as `(dx, dy)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring cell in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper grid bounds are the caller's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// Identity of a cat, written as a single uppercase letter in layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct CatColor(char);

impl CatColor {
    /// The red cat of the default roster.
    pub const RED: Self = Self('R');
    /// The green cat of the default roster.
    pub const GREEN: Self = Self('G');
    /// The blue cat of the default roster.
    pub const BLUE: Self = Self('B');

    /// Creates a color from its layout letter, which must be uppercase ASCII.
    #[must_use]
    pub const fn new(letter: char) -> Option<Self> {
        if letter.is_ascii_uppercase() {
            Some(Self(letter))
        } else {
            None
        }
    }
}

impl TryFrom<char> for CatColor {
    type Error = String;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Self::new(letter).ok_or_else(|| format!("'{letter}' is not an uppercase ASCII letter"))
    }
}

impl From<CatColor> for char {
    fn from(color: CatColor) -> Self {
        color.0
    }
}

impl fmt::Display for CatColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::RED => f.write_str("RED"),
            Self::GREEN => f.write_str("GREEN"),
            Self::BLUE => f.write_str("BLUE"),
            Self(letter) => write!(f, "{letter}"),
        }
    }
}

/// Lifecycle state of a cat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatStatus {
    /// Walks one cell per turn.
    Active,
    /// Skips the next movement, then becomes active again.
    StuckInMud,
    /// Stays in place next turn to flatten one more floor.
    Stomping,
    /// Reached its own bed. Terminal.
    Finished,
    /// Lost a fight. Terminal.
    Defeated,
}

impl CatStatus {
    /// Reports whether the cat will never act again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Defeated)
    }
}

/// Directives that can be attached to commandable tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommandKind {
    /// Reorients the cat to face north.
    TurnNorth,
    /// Reorients the cat to face south.
    TurnSouth,
    /// Reorients the cat to face east.
    TurnEast,
    /// Reorients the cat to face west.
    TurnWest,
    /// Keeps the cat on a building for one more floor.
    Stomp,
    /// Grants a flat power bonus.
    Powerup,
}

impl CommandKind {
    /// Every directive in declaration order.
    pub const ALL: [Self; 6] = [
        Self::TurnNorth,
        Self::TurnSouth,
        Self::TurnEast,
        Self::TurnWest,
        Self::Stomp,
        Self::Powerup,
    ];

    /// Budget consumed by placing the directive.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::TurnNorth | Self::TurnSouth | Self::TurnEast | Self::TurnWest => 10,
            Self::Stomp => 20,
            Self::Powerup => 30,
        }
    }

    /// Heading imposed by turn directives.
    #[must_use]
    pub const fn heading(self) -> Option<Direction> {
        match self {
            Self::TurnNorth => Some(Direction::North),
            Self::TurnSouth => Some(Direction::South),
            Self::TurnEast => Some(Direction::East),
            Self::TurnWest => Some(Direction::West),
            Self::Stomp | Self::Powerup => None,
        }
    }

    /// Single-character code used in command grids.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::TurnNorth => 'U',
            Self::TurnSouth => 'D',
            Self::TurnEast => 'R',
            Self::TurnWest => 'L',
            Self::Stomp => 'S',
            Self::Powerup => 'P',
        }
    }

    /// Parses a command grid code. Codes are case-insensitive.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code.to_ascii_uppercase())
    }
}

/// Footprint class of a building, which determines the power per floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingSize {
    /// House worth the smaller per-floor reward.
    Small,
    /// Tower worth the larger per-floor reward.
    Large,
}

/// Read-only description of a tile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground.
    Empty,
    /// Impassable wall.
    Wall,
    /// Impassable boulder.
    Boulder,
    /// Mud that holds a cat for one turn.
    Mud,
    /// Trap that halves a cat's power.
    SpikeTrap,
    /// Single-use power multiplier.
    PowerSource {
        /// Whether the source was already drained.
        destroyed: bool,
    },
    /// Building made of destructible floors.
    Building {
        /// Footprint class of the building.
        size: BuildingSize,
        /// Floors the building was constructed with.
        total_floors: u8,
        /// Floors still standing.
        remaining_floors: u8,
    },
    /// Bed reserved for one cat.
    Bed {
        /// Cat the bed belongs to.
        color: CatColor,
    },
}

/// Score adjustment granted to a cat reaching its bed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalBonus {
    /// Adds a flat amount of power.
    Add(u64),
    /// Multiplies the cat's power.
    Multiply(u64),
}

impl ArrivalBonus {
    /// Applies the bonus to the provided power, saturating on overflow.
    #[must_use]
    pub const fn apply(self, power: u64) -> u64 {
        match self {
            Self::Add(amount) => power.saturating_add(amount),
            Self::Multiply(factor) => power.saturating_mul(factor),
        }
    }
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The tile cannot hold a directive right now.
    NotCommandable,
    /// The floor index does not exist on the tile or was already destroyed.
    InvalidFloor,
    /// The directive would push spending past the budget.
    OverBudget,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OutOfBounds => "cell is outside the grid",
            Self::NotCommandable => "tile cannot hold a command",
            Self::InvalidFloor => "floor does not exist on the tile",
            Self::OverBudget => "command exceeds the remaining budget",
        };
        f.write_str(reason)
    }
}

/// Directive attached to a specific tile floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacedCommand {
    /// Cell holding the commanded tile.
    pub cell: CellCoord,
    /// Floor slot holding the directive.
    pub floor: u8,
    /// Attached directive.
    pub kind: CommandKind,
}

/// Immutable representation of a single cat's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatSnapshot {
    /// Identity of the cat.
    pub color: CatColor,
    /// Combat tie-break rank; lower wins.
    pub hierarchy: u32,
    /// Grid cell currently occupied by the cat.
    pub cell: CellCoord,
    /// Current heading.
    pub direction: Direction,
    /// Current power.
    pub power: u64,
    /// Lifecycle state.
    pub status: CatStatus,
}

/// Read-only snapshot describing all cats on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatView {
    snapshots: Vec<CatSnapshot>,
}

impl CatView {
    /// Creates a new cat view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CatSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.hierarchy, snapshot.color));
        Self { snapshots }
    }

    /// Iterator over the captured cat snapshots in hierarchy order.
    pub fn iter(&self) -> impl Iterator<Item = &CatSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the cat with the provided color, if it exists.
    #[must_use]
    pub fn get(&self, color: CatColor) -> Option<&CatSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.color == color)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArrivalBonus, CatColor, CellCoord, Command, CommandKind, Direction, Event, PlacementError,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_leave_the_low_edges() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn opposite_directions_pair_up() {
        for direction in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dx, dy) = direction.offset();
            let (ox, oy) = direction.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn command_costs_match_price_list() {
        assert_eq!(CommandKind::TurnNorth.cost(), 10);
        assert_eq!(CommandKind::TurnWest.cost(), 10);
        assert_eq!(CommandKind::Stomp.cost(), 20);
        assert_eq!(CommandKind::Powerup.cost(), 30);
    }

    #[test]
    fn command_codes_parse_case_insensitively() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_code(kind.code()), Some(kind));
            assert_eq!(
                CommandKind::from_code(kind.code().to_ascii_lowercase()),
                Some(kind)
            );
        }
        assert_eq!(CommandKind::from_code('x'), None);
        assert_eq!(CommandKind::from_code('.'), None);
    }

    #[test]
    fn cat_color_requires_uppercase_letters() {
        assert_eq!(CatColor::new('R'), Some(CatColor::RED));
        assert_eq!(CatColor::new('r'), None);
        assert_eq!(CatColor::new('7'), None);
        assert_eq!(CatColor::RED.to_string(), "RED");
        assert_eq!(CatColor::new('Y').map(|color| color.to_string()), Some("Y".to_owned()));
        assert_eq!(char::from(CatColor::BLUE), 'B');
    }

    #[test]
    fn arrival_bonus_saturates() {
        assert_eq!(ArrivalBonus::Add(2000).apply(500), 2500);
        assert_eq!(ArrivalBonus::Multiply(3).apply(500), 1500);
        assert_eq!(ArrivalBonus::Multiply(5).apply(u64::MAX), u64::MAX);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn place_command_round_trips_through_bincode() {
        assert_round_trip(&Command::PlaceCommand {
            cell: CellCoord::new(3, 4),
            kind: CommandKind::Stomp,
            floor: 1,
        });
    }

    #[test]
    fn rejection_event_round_trips_through_bincode() {
        assert_round_trip(&Event::CommandRejected {
            cell: CellCoord::new(0, 2),
            floor: 0,
            kind: CommandKind::Powerup,
            reason: PlacementError::OverBudget,
        });
    }

    #[test]
    fn cat_color_round_trips_through_bincode() {
        assert_round_trip(&CatColor::GREEN);
    }
}
