//! Priority ordering of open A* entries.

use std::cmp::Ordering;

use pellet_maze_core::PathId;

/// Open-list entry of the pellet-order search.
///
/// Ordered for a max-heap so that the lowest estimate pops first, then the
/// deepest node among equal estimates, then the oldest entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrontierEntry {
    pub(crate) estimate: u32,
    pub(crate) cost: u32,
    pub(crate) sequence: u64,
    pub(crate) node: PathId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
