#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pellet Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems read the maze exclusively through the
//! [`GridOracle`] trait and respond with new command batches.
//!
//! The search records shared by the router and the pellet planner live here
//! as well: [`Path`] for backward-linked search results and [`PelletState`]
//! for nodes of the pellet-order state space.

mod path;
mod pellets;

use serde::{Deserialize, Serialize};

pub use path::{Backtrack, Path, PathArena, PathId, PathNode};
pub use pellets::{PelletCatalog, PelletSet, PelletState};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by a single tick.
    Tick,
    /// Requests that the agent advance a single step in the specified direction.
    StepAgent {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a wall be raised on the provided cell.
    PlaceWall {
        /// Cell that should become impassable.
        cell: CellCoord,
    },
    /// Requests that the wall occupying the provided cell be removed.
    RemoveWall {
        /// Cell that should become passable.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that the agent successfully moved between two cells.
    AgentMoved {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that the agent collected the pellet lying on a cell.
    PelletCollected {
        /// Cell that held the pellet.
        cell: CellCoord,
        /// Number of pellets still present on the board.
        remaining: usize,
    },
    /// Announces that the last pellet on the board has been collected.
    BoardCleared,
    /// Reports that a step request could not be honoured.
    StepRejected {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that a wall was raised.
    WallPlaced {
        /// Cell that became impassable.
        cell: CellCoord,
    },
    /// Confirms that a wall was removed.
    WallRemoved {
        /// Cell that became passable.
        cell: CellCoord,
    },
    /// Reports that a wall mutation was refused.
    WallRejected {
        /// Cell targeted by the refused mutation.
        cell: CellCoord,
    },
}

/// Cardinal movement directions available to the agent.
///
/// The declaration order is the enumeration order used by every search, which
/// decides among equally short routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Infers the direction of a single orthogonal step between two cells.
    ///
    /// Returns `None` when the cells are identical or not adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
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

    /// Cell reached by moving one step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Board bounds and obstacles are the oracle's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Read-only view of a maze consumed by the routing systems.
///
/// Implementations decide which moves are legal. Searches never mutate the
/// grid; they only query it.
pub trait GridOracle {
    /// Board dimensions as `(columns, rows)`.
    fn dimensions(&self) -> (u32, u32);

    /// Reports whether moving from `cell` in `direction` is permitted.
    fn is_legal_move(&self, cell: CellCoord, direction: Direction) -> bool;

    /// Cell reached by a legal move, or `None` when the move is illegal.
    fn apply_move(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if self.is_legal_move(cell, direction) {
            cell.step(direction)
        } else {
            None
        }
    }

    /// Reports whether `cell` currently holds an uncollected pellet.
    fn has_pellet(&self, cell: CellCoord) -> bool;

    /// Cell currently occupied by the agent.
    fn agent_cell(&self) -> CellCoord;

    /// Every cell that holds a pellet, in ascending order.
    fn pellet_cells(&self) -> Vec<CellCoord>;

    /// Reports whether `cell` lies inside the board.
    fn contains(&self, cell: CellCoord) -> bool {
        let (columns, rows) = self.dimensions();
        cell.column() < columns && cell.row() < rows
    }
}
