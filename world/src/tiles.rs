use kaiju_cats_core::{BuildingSize, CatColor, CellCoord, CommandKind, PlacementError, TileKind};

/// Buildings never stand taller than this.
pub(crate) const MAX_FLOORS: u8 = 2;

/// Single board cell with whatever mutable state its kind needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tile {
    Empty,
    Wall,
    Boulder,
    Mud,
    SpikeTrap,
    PowerSource(PowerSource),
    Building(Building),
    Bed(CatColor),
}

impl Tile {
    pub(crate) fn is_passable(&self) -> bool {
        !matches!(self, Self::Wall | Self::Boulder)
    }

    pub(crate) fn can_hold_command(&self) -> bool {
        match self {
            Self::PowerSource(source) => !source.destroyed,
            Self::Building(building) => building.remaining_floors > 0,
            _ => false,
        }
    }

    /// Number of floor slots the tile exposes to command grids.
    pub(crate) fn command_slots(&self) -> u8 {
        match self {
            Self::PowerSource(_) => 1,
            Self::Building(building) => building.total_floors,
            _ => 0,
        }
    }

    /// Directive currently attached to `floor`, after validating that the
    /// floor may receive a placement.
    pub(crate) fn command_on(&self, floor: u8) -> Result<Option<CommandKind>, PlacementError> {
        if !self.can_hold_command() {
            return Err(PlacementError::NotCommandable);
        }

        match self {
            Self::PowerSource(source) if floor == 0 => Ok(source.command),
            Self::Building(building) if floor < building.remaining_floors => {
                Ok(building.commands[usize::from(floor)])
            }
            _ => Err(PlacementError::InvalidFloor),
        }
    }

    /// Stores `kind` on a floor previously validated through [`Tile::command_on`].
    pub(crate) fn attach(&mut self, kind: CommandKind, floor: u8) {
        match self {
            Self::PowerSource(source) => source.command = Some(kind),
            Self::Building(building) => building.commands[usize::from(floor)] = Some(kind),
            _ => unreachable!("attach called on a tile that cannot hold commands"),
        }
    }

    pub(crate) fn attached_commands(&self) -> impl Iterator<Item = (u8, CommandKind)> + '_ {
        let (slots, count) = match self {
            Self::PowerSource(source) => (std::slice::from_ref(&source.command), 1),
            Self::Building(building) => {
                (building.commands.as_slice(), building.remaining_floors)
            }
            _ => (&[] as &[Option<CommandKind>], 0),
        };
        slots
            .iter()
            .zip(0..count)
            .filter_map(|(slot, floor)| slot.map(|kind| (floor, kind)))
    }

    pub(crate) fn kind(&self) -> TileKind {
        match self {
            Self::Empty => TileKind::Empty,
            Self::Wall => TileKind::Wall,
            Self::Boulder => TileKind::Boulder,
            Self::Mud => TileKind::Mud,
            Self::SpikeTrap => TileKind::SpikeTrap,
            Self::PowerSource(source) => TileKind::PowerSource {
                destroyed: source.destroyed,
            },
            Self::Building(building) => TileKind::Building {
                size: building.size,
                total_floors: building.total_floors,
                remaining_floors: building.remaining_floors,
            },
            Self::Bed(color) => TileKind::Bed { color: *color },
        }
    }
}

/// Stack of destructible floors, each worth a fixed amount of power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Building {
    size: BuildingSize,
    power_per_floor: u64,
    total_floors: u8,
    remaining_floors: u8,
    // Index 0 is the ground floor.
    commands: [Option<CommandKind>; MAX_FLOORS as usize],
}

impl Building {
    pub(crate) fn new(size: BuildingSize, floors: u8, power_per_floor: u64) -> Self {
        assert!(
            (1..=MAX_FLOORS).contains(&floors),
            "buildings have between 1 and {MAX_FLOORS} floors, got {floors}"
        );
        Self {
            size,
            power_per_floor,
            total_floors: floors,
            remaining_floors: floors,
            commands: [None; MAX_FLOORS as usize],
        }
    }

    /// Knocks down the top remaining floor.
    ///
    /// Returns `None` once the building is flattened.
    pub(crate) fn demolish_floor(&mut self) -> Option<FloorDemolition> {
        let top = self.remaining_floors.checked_sub(1)?;
        self.remaining_floors = top;
        Some(FloorDemolition {
            power: self.power_per_floor,
            command: self.commands[usize::from(top)],
            remaining_floors: top,
        })
    }

    #[cfg(test)]
    pub(crate) fn remaining_floors(&self) -> u8 {
        self.remaining_floors
    }
}

/// Outcome of knocking down a single floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FloorDemolition {
    pub(crate) power: u64,
    pub(crate) command: Option<CommandKind>,
    pub(crate) remaining_floors: u8,
}

/// Single-use power multiplier with one command slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PowerSource {
    destroyed: bool,
    command: Option<CommandKind>,
}

impl PowerSource {
    /// Uses up the source, yielding its attached command slot.
    ///
    /// Returns `None` when the source was already drained.
    pub(crate) fn drain(&mut self) -> Option<Option<CommandKind>> {
        if self.destroyed {
            return None;
        }
        self.destroyed = true;
        Some(self.command)
    }
}

/// Dense row-major tile storage.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(
            tiles.len() as u64,
            u64::from(columns) * u64::from(rows),
            "tile count must match grid dimensions"
        );
        Self {
            columns,
            rows,
            tiles,
        }
    }

    pub(crate) fn get(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn get_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        self.index(cell).and_then(|index| self.tiles.get_mut(index))
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (CellCoord, &Tile)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(self.tiles.iter()).map(move |(index, tile)| {
            (CellCoord::new(index % columns, index / columns), tile)
        })
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
