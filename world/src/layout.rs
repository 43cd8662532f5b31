//! Text layouts describing the board and where each cat starts and sleeps.
//!
//! A layout is a grid of whitespace-separated tokens, one row per non-blank
//! line. Start tokens leave an empty tile behind; the cat standing on it is
//! spawned by the world.

use std::collections::{BTreeMap, BTreeSet};

use kaiju_cats_core::{BuildingSize, CatColor, CellCoord};
use thiserror::Error;

use crate::{
    config::WorldConfig,
    tiles::{Building, Grid, PowerSource, Tile},
};

/// Reasons a layout or its roster could not be turned into a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout is empty")]
    Empty,
    /// A row had a different number of tokens than the first row.
    #[error("row {row} has {found} tokens, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A token did not name any tile.
    #[error("unknown token `{token}` at {cell}")]
    UnknownToken {
        /// Offending token.
        token: String,
        /// Location of the token.
        cell: CellCoord,
    },
    /// A start or bed named a color that is not on the roster.
    #[error("color `{letter}` at {cell} is not on the roster")]
    UnknownColor {
        /// Color letter used by the token.
        letter: char,
        /// Location of the token.
        cell: CellCoord,
    },
    /// A color had more than one start.
    #[error("{color} starts at both {first} and {second}")]
    DuplicateStart {
        /// Cat with two starts.
        color: CatColor,
        /// First start found.
        first: CellCoord,
        /// Second start found.
        second: CellCoord,
    },
    /// A color had more than one bed.
    #[error("{color} has beds at both {first} and {second}")]
    DuplicateBed {
        /// Cat with two beds.
        color: CatColor,
        /// First bed found.
        first: CellCoord,
        /// Second bed found.
        second: CellCoord,
    },
    /// A cat starts on the board but has nowhere to sleep.
    #[error("{color} has a start but no bed")]
    MissingBed {
        /// Cat without a bed.
        color: CatColor,
    },
    /// The roster lists the same color twice.
    #[error("roster lists {color} more than once")]
    DuplicateRosterColor {
        /// Repeated color.
        color: CatColor,
    },
    /// Two roster entries share a hierarchy rank.
    #[error("roster rank {hierarchy} is used more than once")]
    DuplicateHierarchy {
        /// Repeated rank.
        hierarchy: u32,
    },
    /// The layout is wider or taller than a coordinate can express.
    #[error("layout dimensions exceed the coordinate range")]
    TooLarge,
}

/// Parsed board plus the start and bed cell of every placed color.
#[derive(Debug)]
pub(crate) struct Layout {
    pub(crate) grid: Grid,
    pub(crate) starts: BTreeMap<CatColor, CellCoord>,
    pub(crate) beds: BTreeMap<CatColor, CellCoord>,
}

pub(crate) fn parse(text: &str, config: &WorldConfig) -> Result<Layout, LayoutError> {
    validate_roster(config)?;

    let mut tiles = Vec::new();
    let mut starts = BTreeMap::new();
    let mut beds = BTreeMap::new();
    let mut columns = None;
    let mut rows = 0u32;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let row = rows;
        let mut width = 0u32;
        for token in line.split_whitespace() {
            let cell = CellCoord::new(width, row);
            let tile = match parse_token(token, cell, config)? {
                Token::Tile(tile) => tile,
                Token::Start(color) => {
                    record_unique(&mut starts, color, cell, |first| {
                        LayoutError::DuplicateStart {
                            color,
                            first,
                            second: cell,
                        }
                    })?;
                    Tile::Empty
                }
                Token::Bed(color) => {
                    record_unique(&mut beds, color, cell, |first| LayoutError::DuplicateBed {
                        color,
                        first,
                        second: cell,
                    })?;
                    Tile::Bed(color)
                }
            };
            tiles.push(tile);
            width = width.checked_add(1).ok_or(LayoutError::TooLarge)?;
        }

        let expected = *columns.get_or_insert(width);
        if width != expected {
            return Err(LayoutError::RaggedRow {
                row,
                expected,
                found: width,
            });
        }
        rows = rows.checked_add(1).ok_or(LayoutError::TooLarge)?;
    }

    let columns = match columns {
        Some(columns) if columns > 0 => columns,
        _ => return Err(LayoutError::Empty),
    };

    if let Some(&color) = starts.keys().find(|color| !beds.contains_key(*color)) {
        return Err(LayoutError::MissingBed { color });
    }

    Ok(Layout {
        grid: Grid::new(columns, rows, tiles),
        starts,
        beds,
    })
}

enum Token {
    Tile(Tile),
    Start(CatColor),
    Bed(CatColor),
}

fn parse_token(token: &str, cell: CellCoord, config: &WorldConfig) -> Result<Token, LayoutError> {
    let rules = &config.rules;
    let building = |size, floors| {
        Token::Tile(Tile::Building(Building::new(
            size,
            floors,
            rules.power_per_floor(size),
        )))
    };

    let token = match token {
        "." => Token::Tile(Tile::Empty),
        "#" => Token::Tile(Tile::Wall),
        "X" => Token::Tile(Tile::Boulder),
        "M" => Token::Tile(Tile::Mud),
        "S" => Token::Tile(Tile::SpikeTrap),
        "P" => Token::Tile(Tile::PowerSource(PowerSource::default())),
        "h" => building(BuildingSize::Small, 1),
        "hh" => building(BuildingSize::Small, 2),
        "H" => building(BuildingSize::Large, 1),
        "HH" => building(BuildingSize::Large, 2),
        other => {
            if let Some(letter) = other.strip_suffix("Start").and_then(single_char) {
                Token::Start(roster_color(letter, cell, config)?)
            } else if let Some(letter) = other
                .strip_suffix("Bed")
                .or_else(|| other.strip_prefix("UI_"))
                .and_then(single_char)
            {
                Token::Bed(roster_color(letter, cell, config)?)
            } else {
                return Err(LayoutError::UnknownToken {
                    token: other.to_owned(),
                    cell,
                });
            }
        }
    };
    Ok(token)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Some(letter),
        _ => None,
    }
}

fn roster_color(letter: char, cell: CellCoord, config: &WorldConfig) -> Result<CatColor, LayoutError> {
    CatColor::new(letter)
        .filter(|color| config.roster_entry(*color).is_some())
        .ok_or(LayoutError::UnknownColor { letter, cell })
}

fn record_unique(
    cells: &mut BTreeMap<CatColor, CellCoord>,
    color: CatColor,
    cell: CellCoord,
    duplicate: impl FnOnce(CellCoord) -> LayoutError,
) -> Result<(), LayoutError> {
    match cells.insert(color, cell) {
        Some(first) => Err(duplicate(first)),
        None => Ok(()),
    }
}

fn validate_roster(config: &WorldConfig) -> Result<(), LayoutError> {
    let mut colors = BTreeSet::new();
    let mut ranks = BTreeSet::new();
    for entry in &config.roster {
        if !colors.insert(entry.color) {
            return Err(LayoutError::DuplicateRosterColor { color: entry.color });
        }
        if !ranks.insert(entry.hierarchy) {
            return Err(LayoutError::DuplicateHierarchy {
                hierarchy: entry.hierarchy,
            });
        }
    }
    Ok(())
}
