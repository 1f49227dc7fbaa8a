//! Plain-text maze layouts.
//!
//! One character per cell, one line per row:
//!
//! | char        | meaning          |
//! |-------------|------------------|
//! | `#` or `%`  | wall             |
//! | `.`         | pellet           |
//! | `P`         | agent start      |
//! | space, `_`  | open floor       |
//!
//! Rows may be ragged; cells missing at the end of a short row are walls.

use pellet_maze_core::CellCoord;
use thiserror::Error;

/// Contents of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tile {
    Floor,
    Wall,
    Pellet,
}

/// Errors that can occur while parsing a layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contained no cells.
    #[error("layout is empty")]
    Empty,
    /// No `P` marker was found.
    #[error("layout does not place the agent")]
    MissingAgent,
    /// More than one `P` marker was found.
    #[error("layout places the agent twice, at {first:?} and {second:?}")]
    MultipleAgents {
        /// First agent marker encountered in reading order.
        first: CellCoord,
        /// Second agent marker encountered in reading order.
        second: CellCoord,
    },
    /// A character outside the layout legend was found.
    #[error("unknown tile '{character}' at column {column}, row {row}")]
    UnknownTile {
        /// Offending character.
        character: char,
        /// Zero-based column of the character.
        column: u32,
        /// Zero-based row of the character.
        row: u32,
    },
    /// The layout does not fit the coordinate space.
    #[error("layout of {columns}x{rows} cells is too large")]
    TooLarge {
        /// Number of columns in the widest row.
        columns: usize,
        /// Number of rows.
        rows: usize,
    },
}

/// Result of parsing a layout: dense tiles plus the agent's start.
#[derive(Debug)]
pub(crate) struct ParsedLayout {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) agent: CellCoord,
}

pub(crate) fn parse(layout: &str) -> Result<ParsedLayout, LayoutError> {
    let mut lines: Vec<&str> = layout
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        let _ = lines.pop();
    }

    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let height = lines.len();
    if width == 0 || height == 0 {
        return Err(LayoutError::Empty);
    }

    let too_large = || LayoutError::TooLarge {
        columns: width,
        rows: height,
    };
    let columns = u32::try_from(width).map_err(|_| too_large())?;
    let rows = u32::try_from(height).map_err(|_| too_large())?;
    let cell_count = width.checked_mul(height).ok_or_else(too_large)?;

    let mut tiles = vec![Tile::Wall; cell_count];
    let mut agent: Option<CellCoord> = None;

    for (row, line) in (0..rows).zip(&lines) {
        for (column, character) in (0..columns).zip(line.chars()) {
            let cell = CellCoord::new(column, row);
            let tile = match character {
                '#' | '%' => Tile::Wall,
                '.' => Tile::Pellet,
                ' ' | '_' => Tile::Floor,
                'P' => {
                    if let Some(first) = agent {
                        return Err(LayoutError::MultipleAgents {
                            first,
                            second: cell,
                        });
                    }
                    agent = Some(cell);
                    Tile::Floor
                }
                other => {
                    return Err(LayoutError::UnknownTile {
                        character: other,
                        column,
                        row,
                    })
                }
            };
            tiles[row as usize * width + column as usize] = tile;
        }
    }

    let agent = agent.ok_or(LayoutError::MissingAgent)?;
    Ok(ParsedLayout {
        columns,
        rows,
        tiles,
        agent,
    })
}

pub(crate) fn render(columns: u32, tiles: &[Tile], agent: CellCoord) -> String {
    let width = columns as usize;
    if width == 0 {
        return String::new();
    }

    let mut rendered = String::with_capacity(tiles.len() + tiles.len() / width);
    for (index, tile) in tiles.iter().enumerate() {
        let column = index % width;
        let row = index / width;
        let character = if CellCoord::new(column as u32, row as u32) == agent {
            'P'
        } else {
            match tile {
                Tile::Floor => ' ',
                Tile::Wall => '#',
                Tile::Pellet => '.',
            }
        };
        rendered.push(character);
        if column + 1 == width {
            rendered.push('\n');
        }
    }
    rendered
}
