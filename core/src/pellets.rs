//! Search-space nodes for pellet-order planning.

use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::CellCoord;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed enumeration of the pellet cells seen at the start of a planning call.
///
/// Cells are sorted and deduplicated, so the same pellet layout always yields
/// the same indices regardless of the order the cells were supplied in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PelletCatalog {
    cells: Vec<CellCoord>,
}

impl PelletCatalog {
    /// Builds a catalog from the provided pellet cells.
    #[must_use]
    pub fn new(cells: impl IntoIterator<Item = CellCoord>) -> Self {
        let mut cells: Vec<CellCoord> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// Number of pellets enumerated by the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the catalog enumerates no pellets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pellet cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Cell assigned to `index`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// Index assigned to `cell`, if the cell held a pellet.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        self.cells.binary_search(&cell).ok()
    }
}

/// Bitset over the indices of a [`PelletCatalog`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PelletSet {
    words: Box<[u64]>,
}

impl PelletSet {
    /// Set containing every index below `len`.
    #[must_use]
    pub fn full(len: usize) -> Self {
        let mut words = vec![u64::MAX; len.div_ceil(WORD_BITS)];
        let tail = len % WORD_BITS;
        if let (Some(last), true) = (words.last_mut(), tail != 0) {
            *last = (1_u64 << tail) - 1;
        }
        Self {
            words: words.into_boxed_slice(),
        }
    }

    /// Reports whether `index` is a member of the set.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1_u64 << (index % WORD_BITS)) != 0)
    }

    /// Removes `index`, returning whether it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        let Some(word) = self.words.get_mut(index / WORD_BITS) else {
            return false;
        };
        let mask = 1_u64 << (index % WORD_BITS);
        let present = *word & mask != 0;
        *word &= !mask;
        present
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Reports whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(word_index, &word)| {
                let mut bits = word;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let offset = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some(word_index * WORD_BITS + offset)
                })
            })
    }
}

/// Agent position plus the pellets that have not been collected yet.
///
/// Equality and hashing cover the position and the remaining set only. All
/// states derived from one initial state share its catalog.
#[derive(Clone)]
pub struct PelletState {
    position: CellCoord,
    remaining: PelletSet,
    catalog: Rc<PelletCatalog>,
}

impl PelletState {
    /// Initial state with every provided pellet still uncollected.
    #[must_use]
    pub fn new(position: CellCoord, pellets: impl IntoIterator<Item = CellCoord>) -> Self {
        let catalog = PelletCatalog::new(pellets);
        Self {
            position,
            remaining: PelletSet::full(catalog.len()),
            catalog: Rc::new(catalog),
        }
    }

    /// Cell occupied by the agent in this state.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Enumeration shared by every state of the same planning call.
    #[must_use]
    pub fn catalog(&self) -> &PelletCatalog {
        &self.catalog
    }

    /// Catalog indices of the pellets not yet collected.
    #[must_use]
    pub const fn remaining_set(&self) -> &PelletSet {
        &self.remaining
    }

    /// Number of pellets not yet collected.
    #[must_use]
    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    /// Cells of the pellets not yet collected, in catalog order.
    pub fn remaining(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.remaining
            .iter()
            .filter_map(|index| self.catalog.cell(index))
    }

    /// Reports whether the pellet on `cell` is still uncollected.
    #[must_use]
    pub fn holds(&self, cell: CellCoord) -> bool {
        self.catalog
            .index_of(cell)
            .is_some_and(|index| self.remaining.contains(index))
    }

    /// Reports whether every pellet has been collected.
    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.remaining.is_empty()
    }

    /// State reached by walking to `pellet` and collecting it.
    ///
    /// # Panics
    ///
    /// Panics if `pellet` is not among the remaining pellets.
    #[must_use]
    pub fn collect_pellet(&self, pellet: CellCoord) -> PelletState {
        let Some(index) = self.catalog.index_of(pellet) else {
            panic!(
                "pellet at ({}, {}) is not in the catalog",
                pellet.column(),
                pellet.row()
            );
        };
        self.collect_index(index)
    }

    /// State reached by collecting the pellet with catalog index `index`.
    ///
    /// # Panics
    ///
    /// Panics if the pellet was already collected or the index is unknown.
    #[must_use]
    pub fn collect_index(&self, index: usize) -> PelletState {
        let mut remaining = self.remaining.clone();
        let removed = remaining.remove(index);
        assert!(removed, "pellet {index} already collected");
        let position = self
            .catalog
            .cell(index)
            .unwrap_or(self.position);

        PelletState {
            position,
            remaining,
            catalog: Rc::clone(&self.catalog),
        }
    }

    /// Every state reachable by collecting one remaining pellet next.
    pub fn successors(&self) -> impl Iterator<Item = PelletState> + '_ {
        self.remaining.iter().map(|index| self.collect_index(index))
    }
}

impl PartialEq for PelletState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.remaining == other.remaining
    }
}

impl Eq for PelletState {}

impl Hash for PelletState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.remaining.hash(state);
    }
}

impl fmt::Debug for PelletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PelletState")
            .field("position", &self.position)
            .field("remaining", &self.remaining().collect::<Vec<_>>())
            .finish()
    }
}
