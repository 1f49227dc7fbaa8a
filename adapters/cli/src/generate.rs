//! Seeded random layout generation.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Parameters of a generated board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GenerateOptions {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) pellets: usize,
    pub(crate) walls: usize,
    pub(crate) seed: u64,
}

/// Errors raised when the requested board cannot be generated.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum GenerateError {
    /// The board has no cells at all.
    #[error("board dimensions {columns}x{rows} contain no cells")]
    Empty {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The agent, pellets and walls do not fit on the board.
    #[error("{requested} occupied cells requested but the board only has {available}")]
    Overcrowded {
        /// Cells needed for the agent, pellets and walls.
        requested: usize,
        /// Cells on the board.
        available: usize,
    },
}

/// Scatters the agent, pellets and walls over an empty board.
///
/// Placement is a seeded shuffle of every cell, so equal options always
/// yield the same layout. Reachability of the pellets is not guaranteed.
pub(crate) fn generate_layout(options: GenerateOptions) -> Result<String, GenerateError> {
    let columns = usize::try_from(options.columns).unwrap_or(usize::MAX);
    let rows = usize::try_from(options.rows).unwrap_or(usize::MAX);
    let available = columns.checked_mul(rows).unwrap_or(usize::MAX);
    if available == 0 {
        return Err(GenerateError::Empty {
            columns: options.columns,
            rows: options.rows,
        });
    }

    let requested = options
        .pellets
        .saturating_add(options.walls)
        .saturating_add(1);
    if requested > available {
        return Err(GenerateError::Overcrowded {
            requested,
            available,
        });
    }

    let mut tiles = vec!['_'; available];
    let mut order: Vec<usize> = (0..available).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(options.seed));

    let (agent, rest) = order.split_at(1);
    let (pellets, rest) = rest.split_at(options.pellets);
    tiles[agent[0]] = 'P';
    for &cell in pellets {
        tiles[cell] = '.';
    }
    for &cell in &rest[..options.walls] {
        tiles[cell] = '#';
    }

    let mut layout = String::with_capacity(available + rows);
    for row in tiles.chunks(columns) {
        layout.extend(row);
        layout.push('\n');
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use pellet_maze_world::{query, World};

    use super::*;

    fn options(seed: u64) -> GenerateOptions {
        GenerateOptions {
            columns: 8,
            rows: 5,
            pellets: 6,
            walls: 9,
            seed,
        }
    }

    #[test]
    fn generated_layout_places_every_requested_tile() {
        let layout = generate_layout(options(7)).expect("board fits");
        let world = World::from_layout(&layout).expect("generated layout parses");

        assert_eq!(query::dimensions(&world), (8, 5));
        assert_eq!(query::pellet_count(&world), 6);
        assert_eq!(layout.matches('#').count(), 9);
        assert_eq!(layout.matches('P').count(), 1);
    }

    #[test]
    fn equal_seeds_generate_equal_layouts() {
        assert_eq!(generate_layout(options(11)), generate_layout(options(11)));
        assert_ne!(generate_layout(options(11)), generate_layout(options(12)));
    }

    #[test]
    fn rejects_boards_that_cannot_hold_the_request() {
        let mut crowded = options(0);
        crowded.walls = 40;
        assert_eq!(
            generate_layout(crowded),
            Err(GenerateError::Overcrowded {
                requested: 47,
                available: 40
            })
        );

        let mut empty = options(0);
        empty.rows = 0;
        assert_eq!(
            generate_layout(empty),
            Err(GenerateError::Empty {
                columns: 8,
                rows: 0
            })
        );
    }
}
