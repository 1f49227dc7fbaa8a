#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first grid routing and the per-call distance cache built on it.
//!
//! [`GridRouter`] answers point-to-point queries and produces full
//! single-source [`DistanceMap`]s. [`DistanceCache`] memoizes those maps by
//! source cell so that repeated queries within one planning call expand the
//! grid once per source.

mod cache;

use std::collections::VecDeque;

use pellet_maze_core::{CellCoord, Direction, GridOracle, Path, PathArena, PathId};

pub use cache::{CacheStats, DistanceCache};

const UNREACHABLE: u32 = u32::MAX;

/// Breadth-first router over the legal moves reported by a [`GridOracle`].
///
/// The router keeps its frontier and visited buffers between calls so that
/// repeated searches on the same board do not reallocate.
#[derive(Debug, Default)]
pub struct GridRouter {
    frontier: VecDeque<PathId>,
    cells: VecDeque<CellCoord>,
    visited: Vec<bool>,
    arena: PathArena<CellCoord>,
}

impl GridRouter {
    /// Creates a router with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a cheapest sequence of legal moves from `origin` to `target`.
    ///
    /// Returns a zero-cost single-node path when both cells are equal and
    /// `None` when `target` cannot be reached. Among equally short routes the
    /// one discovered first in [`Direction::ALL`] order wins.
    pub fn route<G>(
        &mut self,
        oracle: &G,
        origin: CellCoord,
        target: CellCoord,
    ) -> Option<Path<CellCoord>>
    where
        G: GridOracle + ?Sized,
    {
        if origin == target {
            return Some(Path::origin_only(origin));
        }

        let (columns, rows) = oracle.dimensions();
        let origin_index = index(columns, rows, origin)?;
        self.prepare(columns, rows);
        self.arena.clear();
        self.frontier.clear();

        self.visited[origin_index] = true;
        let root = self.arena.push_origin(origin);
        self.frontier.push_back(root);

        while let Some(id) = self.frontier.pop_front() {
            let cell = *self.arena.node(id).destination();
            if cell == target {
                return Some(self.arena.extract(id));
            }

            for next in successors(oracle, cell) {
                let Some(next_index) = index(columns, rows, next) else {
                    continue;
                };
                if self.visited[next_index] {
                    continue;
                }
                self.visited[next_index] = true;

                let child = self.arena.push_step(id, next, 1);
                self.frontier.push_back(child);
            }
        }

        None
    }

    /// Concrete cells from `origin` (exclusive) to `target` (inclusive).
    ///
    /// Equal cells yield an empty route; unreachable targets yield `None`.
    pub fn find_route<G>(
        &mut self,
        oracle: &G,
        origin: CellCoord,
        target: CellCoord,
    ) -> Option<Vec<CellCoord>>
    where
        G: GridOracle + ?Sized,
    {
        let path = self.route(oracle, origin, target)?;
        let mut cells = path.into_states();
        let _ = cells.remove(0);
        Some(cells)
    }

    /// Expands the whole reachable region around `source`.
    ///
    /// Identical mechanics to [`GridRouter::route`] without an early exit.
    pub fn flood<G>(&mut self, oracle: &G, source: CellCoord) -> DistanceMap
    where
        G: GridOracle + ?Sized,
    {
        let (columns, rows) = oracle.dimensions();
        let mut map = DistanceMap::unreachable(source, columns, rows);
        let Some(source_index) = index(columns, rows, source) else {
            return map;
        };

        self.cells.clear();
        map.distances[source_index] = 0;
        self.cells.push_back(source);

        while let Some(cell) = self.cells.pop_front() {
            let Some(current_index) = index(columns, rows, cell) else {
                continue;
            };
            let next_distance = map.distances[current_index] + 1;

            for next in successors(oracle, cell) {
                let Some(next_index) = index(columns, rows, next) else {
                    continue;
                };
                if map.distances[next_index] <= next_distance {
                    continue;
                }

                map.distances[next_index] = next_distance;
                self.cells.push_back(next);
            }
        }

        map
    }

    fn prepare(&mut self, columns: u32, rows: u32) {
        let cell_count = cell_count(columns, rows);
        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
        } else {
            self.visited.fill(false);
        }
    }
}

/// Concrete cells from `origin` (exclusive) to `target` (inclusive).
///
/// Convenience wrapper that routes with a fresh [`GridRouter`].
pub fn find_route<G>(oracle: &G, origin: CellCoord, target: CellCoord) -> Option<Vec<CellCoord>>
where
    G: GridOracle + ?Sized,
{
    GridRouter::new().find_route(oracle, origin, target)
}

/// Dense step counts from a single source cell.
///
/// Distances are stored in row-major order. Cells the flood never reached are
/// reported as `None`.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    source: CellCoord,
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
}

impl DistanceMap {
    fn unreachable(source: CellCoord, columns: u32, rows: u32) -> Self {
        Self {
            source,
            columns,
            rows,
            distances: vec![UNREACHABLE; cell_count(columns, rows)],
        }
    }

    /// Cell the distances were measured from.
    #[must_use]
    pub const fn source(&self) -> CellCoord {
        self.source
    }

    /// Board dimensions the map was computed for.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Step count from the source to `cell`, if reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell == self.source {
            return Some(0);
        }

        let offset = index(self.columns, self.rows, cell)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Every reachable cell with its step count, in row-major order.
    pub fn reachable(&self) -> impl Iterator<Item = (CellCoord, u32)> + '_ {
        let width = self.columns.max(1);
        (0_u32..)
            .zip(self.distances.iter().copied())
            .filter(|(_, distance)| *distance != UNREACHABLE)
            .map(move |(offset, distance)| {
                (CellCoord::new(offset % width, offset / width), distance)
            })
    }
}

fn successors<G>(oracle: &G, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_
where
    G: GridOracle + ?Sized,
{
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| oracle.apply_move(cell, direction))
}

fn cell_count(columns: u32, rows: u32) -> usize {
    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).unwrap_or(0)
}

fn index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= columns || cell.row() >= rows {
        return None;
    }

    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
