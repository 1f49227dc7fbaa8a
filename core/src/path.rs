//! Backward-linked search records shared by every search layer.

use std::iter::FusedIterator;

/// Index of a node stored inside a [`PathArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(usize);

impl PathId {
    /// Position of the node inside its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Single search record: where the search arrived, at what cost, and from where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNode<T> {
    destination: T,
    cost: u32,
    parent: Option<PathId>,
}

impl<T> PathNode<T> {
    /// Value reached by this node.
    #[must_use]
    pub fn destination(&self) -> &T {
        &self.destination
    }

    /// Accumulated true cost from the search origin; zero for the origin.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Node that reached this node's predecessor, absent for the origin.
    #[must_use]
    pub const fn parent(&self) -> Option<PathId> {
        self.parent
    }
}

/// Append-only storage for the path nodes created by one search.
///
/// Parents are always pushed before their children, so the parent links form
/// a forest rooted at the origins and can never cycle.
#[derive(Clone, Debug)]
pub struct PathArena<T> {
    nodes: Vec<PathNode<T>>,
}

impl<T> PathArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node while keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Records a search origin with zero cost and no parent.
    pub fn push_origin(&mut self, destination: T) -> PathId {
        let id = PathId(self.nodes.len());
        self.nodes.push(PathNode {
            destination,
            cost: 0,
            parent: None,
        });
        id
    }

    /// Records a node reached from `parent` over an edge of weight `edge_cost`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this arena.
    pub fn push_step(&mut self, parent: PathId, destination: T, edge_cost: u32) -> PathId {
        let parent_cost = self.node(parent).cost;
        let id = PathId(self.nodes.len());
        self.nodes.push(PathNode {
            destination,
            cost: parent_cost.saturating_add(edge_cost),
            parent: Some(parent),
        });
        id
    }

    /// Node stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    #[must_use]
    pub fn node(&self, id: PathId) -> &PathNode<T> {
        &self.nodes[id.0]
    }

    /// Node stored under `id`, if any.
    #[must_use]
    pub fn get(&self, id: PathId) -> Option<&PathNode<T>> {
        self.nodes.get(id.0)
    }

    /// Walks the parent links from `tip` back to its origin.
    #[must_use]
    pub fn backtrack(&self, tip: PathId) -> Backtrack<'_, T> {
        Backtrack {
            arena: self,
            cursor: Some(tip),
        }
    }
}

impl<T: Clone> PathArena<T> {
    /// Copies the chain ending at `tip` into a standalone [`Path`].
    ///
    /// Nodes that are not ancestors of `tip` are left behind, so the returned
    /// path stays small no matter how much of the arena the search explored.
    ///
    /// # Panics
    ///
    /// Panics if `tip` does not belong to this arena.
    #[must_use]
    pub fn extract(&self, tip: PathId) -> Path<T> {
        assert!(tip.0 < self.nodes.len(), "path tip {} outside arena", tip.0);
        let mut chain: Vec<&PathNode<T>> = self.backtrack(tip).collect();
        chain.reverse();

        let nodes = chain
            .into_iter()
            .enumerate()
            .map(|(index, node)| PathNode {
                destination: node.destination.clone(),
                cost: node.cost,
                parent: index.checked_sub(1).map(PathId),
            })
            .collect::<Vec<_>>();
        let tip = PathId(nodes.len().saturating_sub(1));

        Path {
            arena: PathArena { nodes },
            tip,
        }
    }
}

impl<T> Default for PathArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a chain of path nodes, from the tip back to the origin.
#[derive(Debug)]
pub struct Backtrack<'a, T> {
    arena: &'a PathArena<T>,
    cursor: Option<PathId>,
}

impl<'a, T> Iterator for Backtrack<'a, T> {
    type Item = &'a PathNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.cursor?)?;
        self.cursor = node.parent;
        Some(node)
    }
}

impl<T> FusedIterator for Backtrack<'_, T> {}

/// Result of a search: the node that reached a destination plus its ancestry.
///
/// The arena of a path holds exactly the chain from the origin (index zero)
/// to the tip (last index), so the path never retains abandoned branches of
/// the search that produced it.
#[derive(Clone, Debug)]
pub struct Path<T> {
    arena: PathArena<T>,
    tip: PathId,
}

impl<T> Path<T> {
    /// Zero-cost path made of a single origin node.
    #[must_use]
    pub fn origin_only(destination: T) -> Self {
        let mut arena = PathArena::new();
        let tip = arena.push_origin(destination);
        Self { arena, tip }
    }

    /// Value reached at the end of the path.
    #[must_use]
    pub fn destination(&self) -> &T {
        self.arena.node(self.tip).destination()
    }

    /// Accumulated cost from the origin to the destination.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.arena.node(self.tip).cost()
    }

    /// Value the search started from.
    #[must_use]
    pub fn origin(&self) -> &T {
        self.arena.node(PathId(0)).destination()
    }

    /// Number of parent links between the origin and the destination.
    #[must_use]
    pub fn transitions(&self) -> usize {
        self.arena.len() - 1
    }

    /// Nodes from the destination back to the origin.
    #[must_use]
    pub fn backtrack(&self) -> Backtrack<'_, T> {
        self.arena.backtrack(self.tip)
    }

    /// Values in travel order, origin first.
    #[must_use]
    pub fn states(&self) -> Vec<&T> {
        let mut states: Vec<&T> = self.backtrack().map(PathNode::destination).collect();
        states.reverse();
        states
    }

    /// Consumes the path, returning its values in travel order.
    #[must_use]
    pub fn into_states(self) -> Vec<T> {
        self.arena
            .nodes
            .into_iter()
            .map(|node| node.destination)
            .collect()
    }
}
