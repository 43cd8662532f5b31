use std::fmt;

use kaiju_cats_core::{CellCoord, CommandKind};
use kaiju_cats_world::{query, World};
use thiserror::Error;

// Tallest tile a token can describe.
const MAX_SLOTS: usize = 2;
const EMPTY_SLOT: char = '.';

/// Reasons a command grid could not be read.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandGridError {
    /// A token used a character that is neither `.` nor a directive code.
    #[error("unknown command code `{code}` at {cell}")]
    UnknownCode {
        /// Offending character.
        code: char,
        /// Location of the token.
        cell: CellCoord,
    },
    /// A token listed more floor slots than any tile has.
    #[error("token `{token}` at {cell} lists too many floors")]
    TooManySlots {
        /// Offending token.
        token: String,
        /// Location of the token.
        cell: CellCoord,
    },
    /// A row did not match the layout width.
    #[error("row {row} has {found} tokens, expected {expected}")]
    WrongWidth {
        /// Zero-based row index.
        row: u32,
        /// Layout width.
        expected: u32,
        /// Tokens found on the row.
        found: u32,
    },
    /// The grid did not match the layout height.
    #[error("grid has {found} rows, expected {expected}")]
    WrongHeight {
        /// Layout height.
        expected: u32,
        /// Rows found in the grid.
        found: u32,
    },
}

/// Directives for every cell of a board, as read from or written to text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandGrid {
    columns: u32,
    rows: u32,
    // Row-major; each token lists its slots top floor first.
    tokens: Vec<Vec<Option<CommandKind>>>,
}

impl CommandGrid {
    /// Reads a command grid that must match the provided `(columns, rows)`.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandGridError`] for unknown codes, oversized tokens or
    /// dimensions that differ from the layout.
    pub fn parse(text: &str, dimensions: (u32, u32)) -> Result<Self, CommandGridError> {
        let (columns, rows) = dimensions;
        let mut tokens = Vec::new();
        let mut found_rows = 0u32;

        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        for line in lines {
            let row = found_rows;
            found_rows = found_rows.saturating_add(1);
            if row >= rows {
                continue;
            }

            let mut found = 0u32;
            for token in line.split_whitespace() {
                let cell = CellCoord::new(found, row);
                found = found.saturating_add(1);
                if found <= columns {
                    tokens.push(parse_token(token, cell)?);
                }
            }
            if found != columns {
                return Err(CommandGridError::WrongWidth {
                    row,
                    expected: columns,
                    found,
                });
            }
        }

        if found_rows != rows {
            return Err(CommandGridError::WrongHeight {
                expected: rows,
                found: found_rows,
            });
        }

        Ok(Self {
            columns,
            rows,
            tokens,
        })
    }

    /// Captures the directives currently attached to the world's tiles.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let (columns, rows) = query::dimensions(world);
        let mut tokens = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let slots = query::command_slots(world, CellCoord::new(column, row));
                tokens.push(vec![None; usize::from(slots).max(1)]);
            }
        }

        for placed in query::placed_commands(world) {
            let index =
                placed.cell.row() as usize * columns as usize + placed.cell.column() as usize;
            let token = &mut tokens[index];
            let slot = token.len() - 1 - usize::from(placed.floor);
            token[slot] = Some(placed.kind);
        }

        Self {
            columns,
            rows,
            tokens,
        }
    }

    /// Grid size as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of directives the grid lists.
    #[must_use]
    pub fn directive_count(&self) -> usize {
        self.tokens.iter().flatten().flatten().count()
    }

    /// Total cost of every directive the grid lists.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.tokens
            .iter()
            .flatten()
            .flatten()
            .map(|kind| kind.cost())
            .sum()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = GridEntry<'_>> + '_ {
        let columns = self.columns.max(1);
        (0u32..)
            .zip(self.tokens.iter())
            .filter(|(_, slots)| slots.iter().any(Option::is_some))
            .map(move |(index, slots)| GridEntry {
                cell: CellCoord::new(index % columns, index / columns),
                slots,
            })
    }
}

impl fmt::Display for CommandGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).map_err(|_| fmt::Error)?.max(1);
        for row in self.tokens.chunks(width) {
            for (index, slots) in row.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                for slot in slots {
                    let code = slot.map_or(EMPTY_SLOT, CommandKind::code);
                    write!(f, "{code}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Non-empty token of a command grid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridEntry<'a> {
    pub(crate) cell: CellCoord,
    slots: &'a [Option<CommandKind>],
}

impl GridEntry<'_> {
    pub(crate) fn slot_count(&self) -> u8 {
        u8::try_from(self.slots.len()).unwrap_or(u8::MAX)
    }

    /// Directives with their floor, top floor first.
    pub(crate) fn directives(&self) -> impl Iterator<Item = (u8, CommandKind)> + '_ {
        let top = self.slot_count().saturating_sub(1);
        (0..=top)
            .rev()
            .zip(self.slots.iter())
            .filter_map(|(floor, slot)| slot.map(|kind| (floor, kind)))
    }
}

fn parse_token(token: &str, cell: CellCoord) -> Result<Vec<Option<CommandKind>>, CommandGridError> {
    if token.chars().count() > MAX_SLOTS {
        return Err(CommandGridError::TooManySlots {
            token: token.to_owned(),
            cell,
        });
    }

    token
        .chars()
        .map(|code| match code {
            EMPTY_SLOT => Ok(None),
            code => CommandKind::from_code(code)
                .map(Some)
                .ok_or(CommandGridError::UnknownCode { code, cell }),
        })
        .collect()
}
