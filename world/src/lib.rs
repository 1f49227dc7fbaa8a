#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for Pellet Maze.
//!
//! The world owns walls, pellets and the agent's position. It changes only
//! through [`apply`], and systems observe it through the read-only
//! [`query`] functions, most importantly [`query::grid`], which exposes the
//! maze as a [`GridOracle`](pellet_maze_core::GridOracle).

mod layout;

use std::str::FromStr;

use pellet_maze_core::{CellCoord, Command, Direction, Event};

use layout::Tile;
pub use layout::LayoutError;

/// Represents the authoritative Pellet Maze world state.
#[derive(Clone, Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    pellet_count: usize,
    agent: CellCoord,
    tick_index: u64,
}

impl World {
    /// Parses a world from its plain-text layout.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let parsed = layout::parse(layout)?;
        let pellet_count = parsed
            .tiles
            .iter()
            .filter(|tile| **tile == Tile::Pellet)
            .count();

        Ok(Self {
            columns: parsed.columns,
            rows: parsed.rows,
            tiles: parsed.tiles,
            pellet_count,
            agent: parsed.agent,
            tick_index: 0,
        })
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

    fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                if *slot == Tile::Pellet {
                    self.pellet_count -= 1;
                }
                if tile == Tile::Pellet {
                    self.pellet_count += 1;
                }
                *slot = tile;
            }
        }
    }

    fn destination(&self, direction: Direction) -> Option<CellCoord> {
        let next = self.agent.step(direction)?;
        match self.tile(next)? {
            Tile::Wall => None,
            Tile::Floor | Tile::Pellet => Some(next),
        }
    }

    fn step_agent(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(to) = self.destination(direction) else {
            log::trace!("rejected step {direction:?} from {:?}", self.agent);
            out_events.push(Event::StepRejected { direction });
            return;
        };

        let from = self.agent;
        self.agent = to;
        out_events.push(Event::AgentMoved { from, to });

        if self.tile(to) == Some(Tile::Pellet) {
            self.set_tile(to, Tile::Floor);
            out_events.push(Event::PelletCollected {
                cell: to,
                remaining: self.pellet_count,
            });
            if self.pellet_count == 0 {
                out_events.push(Event::BoardCleared);
            }
        }
    }

    fn place_wall(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if cell == self.agent || !matches!(self.tile(cell), Some(Tile::Floor | Tile::Pellet)) {
            out_events.push(Event::WallRejected { cell });
            return;
        }

        self.set_tile(cell, Tile::Wall);
        out_events.push(Event::WallPlaced { cell });
    }

    fn remove_wall(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.tile(cell) != Some(Tile::Wall) {
            out_events.push(Event::WallRejected { cell });
            return;
        }

        self.set_tile(cell, Tile::Floor);
        out_events.push(Event::WallRemoved { cell });
    }
}

impl FromStr for World {
    type Err = LayoutError;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        Self::from_layout(layout)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepAgent { direction } => world.step_agent(direction, out_events),
        Command::PlaceWall { cell } => world.place_wall(cell, out_events),
        Command::RemoveWall { cell } => world.remove_wall(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{layout, Tile, World};
    use pellet_maze_core::{CellCoord, Direction, GridOracle};

    /// Exposes the maze as a read-only grid oracle.
    #[must_use]
    pub fn grid(world: &World) -> GridView<'_> {
        GridView { world }
    }

    /// Cell currently occupied by the agent.
    #[must_use]
    pub fn agent_cell(world: &World) -> CellCoord {
        world.agent
    }

    /// Board dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Every cell holding a pellet, in ascending order.
    #[must_use]
    pub fn pellet_cells(world: &World) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = cells_matching(world, Tile::Pellet).collect();
        cells.sort_unstable();
        cells
    }

    /// Number of pellets still on the board.
    #[must_use]
    pub fn pellet_count(world: &World) -> usize {
        world.pellet_count
    }

    /// Reports whether a wall occupies `cell`. Cells off the board count as walls.
    #[must_use]
    pub fn is_wall(world: &World, cell: CellCoord) -> bool {
        world.tile(cell).map_or(true, |tile| tile == Tile::Wall)
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Renders the world back into its plain-text layout.
    #[must_use]
    pub fn render(world: &World) -> String {
        layout::render(world.columns, &world.tiles, world.agent)
    }

    fn cells_matching(world: &World, wanted: Tile) -> impl Iterator<Item = CellCoord> + '_ {
        let width = world.columns.max(1);
        (0_u32..)
            .zip(world.tiles.iter())
            .filter(move |(_, tile)| **tile == wanted)
            .map(move |(index, _)| CellCoord::new(index % width, index / width))
    }

    /// Borrowed [`GridOracle`] over a world snapshot.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        world: &'a World,
    }

    impl GridOracle for GridView<'_> {
        fn dimensions(&self) -> (u32, u32) {
            dimensions(self.world)
        }

        fn is_legal_move(&self, cell: CellCoord, direction: Direction) -> bool {
            if is_wall(self.world, cell) {
                return false;
            }
            cell.step(direction)
                .is_some_and(|next| !is_wall(self.world, next))
        }

        fn has_pellet(&self, cell: CellCoord) -> bool {
            self.world.tile(cell) == Some(Tile::Pellet)
        }

        fn agent_cell(&self) -> CellCoord {
            agent_cell(self.world)
        }

        fn pellet_cells(&self) -> Vec<CellCoord> {
            pellet_cells(self.world)
        }
    }
}
