//! Per-call memoization of single-source distance maps.

use std::collections::{hash_map::Entry, HashMap};

use pellet_maze_core::{CellCoord, GridOracle};

use crate::{DistanceMap, GridRouter};

/// Hit and miss counters recorded since the last [`DistanceCache::reset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    hits: u64,
    misses: u64,
}

impl CacheStats {
    /// Queries answered from an already stored map.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Queries that required a fresh flood from their source.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }
}

/// Memoized single-source distance maps, valid for one planning call.
///
/// The first query from a source floods the grid once; every later query from
/// the same source is answered from the stored map. Maps go stale as soon as
/// walls or pellets change, so owners must [`reset`](DistanceCache::reset) the
/// cache at the start of every planning call.
#[derive(Debug, Default)]
pub struct DistanceCache {
    router: GridRouter,
    maps: HashMap<CellCoord, DistanceMap>,
    stats: CacheStats,
}

impl DistanceCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Step count from `from` to `to`, or `None` when `to` is unreachable.
    ///
    /// A cell is always zero steps away from itself.
    pub fn distance<G>(&mut self, oracle: &G, from: CellCoord, to: CellCoord) -> Option<u32>
    where
        G: GridOracle + ?Sized,
    {
        if from == to {
            return Some(0);
        }

        self.map(oracle, from).distance(to)
    }

    /// Distance map rooted at `from`, flooding the grid on first use.
    pub fn map<G>(&mut self, oracle: &G, from: CellCoord) -> &DistanceMap
    where
        G: GridOracle + ?Sized,
    {
        match self.maps.entry(from) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let map = self.router.flood(oracle, from);
                log::trace!(
                    "flooded distances from {from:?}: {} reachable cells",
                    map.reachable().count()
                );
                entry.insert(map)
            }
        }
    }

    /// Drops every stored map and clears the counters.
    pub fn reset(&mut self) {
        self.maps.clear();
        self.stats = CacheStats::default();
    }

    /// Number of sources with a stored map.
    #[must_use]
    pub fn sources(&self) -> usize {
        self.maps.len()
    }

    /// Counters recorded since the last reset.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
