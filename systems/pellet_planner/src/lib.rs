#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pellet-order planning over the implicit (position, remaining pellets) graph.
//!
//! Every state transition walks to one remaining pellet and collects it, at a
//! cost equal to the true grid distance between the two cells. An A* search
//! guided by the distance to the nearest remaining pellet finds a visiting
//! order of minimum total travel. Distances come from a [`DistanceCache`]
//! owned by the planner and reset at the start of every planning call.

mod frontier;

use std::collections::{BinaryHeap, HashMap};

use pellet_maze_core::{CellCoord, GridOracle, Path, PathArena, PelletState};
use pellet_maze_system_router::{DistanceCache, GridRouter};

use frontier::FrontierEntry;

const DEFAULT_EXPANSION_LIMIT: usize = 200_000;

/// Configuration parameters required to construct the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    expansion_limit: Option<usize>,
}

impl PlannerConfig {
    /// Creates a configuration with the provided expansion budget.
    ///
    /// `None` lets the search run until it finds the optimum or proves that
    /// no complete order exists.
    #[must_use]
    pub const fn new(expansion_limit: Option<usize>) -> Self {
        Self { expansion_limit }
    }

    /// Maximum number of states expanded before falling back to the greedy order.
    #[must_use]
    pub const fn expansion_limit(&self) -> Option<usize> {
        self.expansion_limit
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(Some(DEFAULT_EXPANSION_LIMIT))
    }
}

/// Counters describing the most recent planning call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    expansions: usize,
    generated: usize,
    cache_sources: usize,
    cache_hits: u64,
    budget_exhausted: bool,
}

impl PlanStats {
    /// States taken off the frontier and expanded.
    #[must_use]
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// States pushed onto the frontier, the initial state excluded.
    #[must_use]
    pub const fn generated(&self) -> usize {
        self.generated
    }

    /// Distinct source cells flooded by the distance cache.
    #[must_use]
    pub const fn cache_sources(&self) -> usize {
        self.cache_sources
    }

    /// Distance queries answered from an already flooded source.
    #[must_use]
    pub const fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Reports whether the expansion budget cut the search short.
    #[must_use]
    pub const fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }
}

enum SearchOutcome {
    Found(Path<PelletState>),
    Exhausted,
    OverBudget,
}

/// Informed best-first planner deciding the order in which to collect pellets.
#[derive(Debug, Default)]
pub struct PelletPlanner {
    config: PlannerConfig,
    cache: DistanceCache,
    router: GridRouter,
    stats: PlanStats,
}

impl PelletPlanner {
    /// Creates a new planner using the supplied configuration.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration the planner was created with.
    #[must_use]
    pub const fn config(&self) -> PlannerConfig {
        self.config
    }

    /// Counters describing the most recent planning call.
    #[must_use]
    pub const fn last_stats(&self) -> PlanStats {
        self.stats
    }

    /// Finds a minimum-cost order that collects every pellet of `initial`.
    ///
    /// Returns a zero-cost single-state path when nothing remains and `None`
    /// when some pellet cannot be reached. If the expansion budget runs out
    /// first, the greedy nearest-pellet order is returned instead.
    pub fn plan<G>(&mut self, oracle: &G, initial: &PelletState) -> Option<Path<PelletState>>
    where
        G: GridOracle + ?Sized,
    {
        self.begin();

        let outcome = self.search(oracle, initial);
        let path = match outcome {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::Exhausted => None,
            SearchOutcome::OverBudget => {
                log::warn!(
                    "pellet search gave up after {} expansions; using the greedy order",
                    self.stats.expansions
                );
                self.stats.budget_exhausted = true;
                self.greedy(oracle, initial)
            }
        };

        self.finish(initial, path.as_ref());
        path
    }

    /// Visits the nearest remaining pellet first, every time.
    ///
    /// Ties are broken by catalog order. Returns `None` when some pellet
    /// cannot be reached.
    pub fn plan_greedy<G>(
        &mut self,
        oracle: &G,
        initial: &PelletState,
    ) -> Option<Path<PelletState>>
    where
        G: GridOracle + ?Sized,
    {
        self.begin();
        let path = self.greedy(oracle, initial);
        self.finish(initial, path.as_ref());
        path
    }

    /// Full cell sequence collecting every pellet on the board.
    ///
    /// Plans from the oracle's current snapshot and stitches the cell routes
    /// between consecutive pellets together. Returns `None` when no complete
    /// order exists.
    pub fn plan_pellet_order<G>(&mut self, oracle: &G) -> Option<Vec<CellCoord>>
    where
        G: GridOracle + ?Sized,
    {
        let initial = PelletState::new(oracle.agent_cell(), oracle.pellet_cells());
        let path = self.plan(oracle, &initial)?;
        self.route_through(oracle, &path)
    }

    /// Concatenates the cell routes between consecutive states of `path`.
    ///
    /// The first state's position is excluded; every later position appears
    /// as the last cell of its segment.
    pub fn route_through<G>(
        &mut self,
        oracle: &G,
        path: &Path<PelletState>,
    ) -> Option<Vec<CellCoord>>
    where
        G: GridOracle + ?Sized,
    {
        let states = path.states();
        let mut cells = Vec::with_capacity(path.cost() as usize);
        for pair in states.windows(2) {
            let segment = self
                .router
                .find_route(oracle, pair[0].position(), pair[1].position())?;
            cells.extend(segment);
        }
        Some(cells)
    }

    fn begin(&mut self) {
        self.cache.reset();
        self.stats = PlanStats::default();
    }

    fn finish(&mut self, initial: &PelletState, path: Option<&Path<PelletState>>) {
        self.stats.cache_sources = self.cache.sources();
        self.stats.cache_hits = self.cache.stats().hits();

        match path {
            Some(path) => log::debug!(
                "ordered {} pellets from {:?}: cost {}, {} expansions, {} flooded sources",
                initial.remaining_len(),
                initial.position(),
                path.cost(),
                self.stats.expansions,
                self.stats.cache_sources
            ),
            None => log::debug!(
                "no complete order for {} pellets from {:?}",
                initial.remaining_len(),
                initial.position()
            ),
        }
    }

    fn search<G>(&mut self, oracle: &G, initial: &PelletState) -> SearchOutcome
    where
        G: GridOracle + ?Sized,
    {
        let Some(initial_estimate) = self.heuristic(oracle, initial) else {
            return SearchOutcome::Exhausted;
        };

        let mut arena = PathArena::new();
        let mut best_cost: HashMap<PelletState, u32> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        let mut sequence: u64 = 0;

        let root = arena.push_origin(initial.clone());
        let _ = best_cost.insert(initial.clone(), 0);
        frontier.push(FrontierEntry {
            estimate: initial_estimate,
            cost: 0,
            sequence,
            node: root,
        });

        while let Some(entry) = frontier.pop() {
            let state = arena.node(entry.node).destination().clone();
            if best_cost
                .get(&state)
                .is_some_and(|&recorded| entry.cost > recorded)
            {
                continue;
            }

            if state.is_goal() {
                return SearchOutcome::Found(arena.extract(entry.node));
            }

            if self
                .config
                .expansion_limit
                .is_some_and(|limit| self.stats.expansions >= limit)
            {
                return SearchOutcome::OverBudget;
            }
            self.stats.expansions += 1;

            let position = state.position();
            for index in state.remaining_set().iter() {
                let Some(pellet) = state.catalog().cell(index) else {
                    continue;
                };
                let Some(step) = self.cache.distance(oracle, position, pellet) else {
                    continue;
                };

                let next = state.collect_index(index);
                let cost = entry.cost.saturating_add(step);
                if best_cost
                    .get(&next)
                    .is_some_and(|&recorded| recorded <= cost)
                {
                    continue;
                }
                let Some(estimate) = self.heuristic(oracle, &next) else {
                    continue;
                };

                let _ = best_cost.insert(next.clone(), cost);
                let node = arena.push_step(entry.node, next, step);
                sequence += 1;
                self.stats.generated += 1;
                frontier.push(FrontierEntry {
                    estimate: cost.saturating_add(estimate),
                    cost,
                    sequence,
                    node,
                });
            }
        }

        SearchOutcome::Exhausted
    }

    /// Distance to the nearest remaining pellet; zero once every pellet is
    /// collected.
    ///
    /// Returns `None` for dead states, where some remaining pellet cannot be
    /// reached from the current position. No later position can reach it
    /// either, because every later position is itself reachable from here.
    fn heuristic<G>(&mut self, oracle: &G, state: &PelletState) -> Option<u32>
    where
        G: GridOracle + ?Sized,
    {
        if state.is_goal() {
            return Some(0);
        }

        let position = state.position();
        let map = self.cache.map(oracle, position);
        let mut nearest = u32::MAX;
        for pellet in state.remaining() {
            nearest = nearest.min(map.distance(pellet)?);
        }
        Some(nearest)
    }

    fn greedy<G>(&mut self, oracle: &G, initial: &PelletState) -> Option<Path<PelletState>>
    where
        G: GridOracle + ?Sized,
    {
        let mut arena = PathArena::new();
        let mut tip = arena.push_origin(initial.clone());
        let mut current = initial.clone();

        while !current.is_goal() {
            let position = current.position();
            let map = self.cache.map(oracle, position);
            let (index, step) = current
                .remaining_set()
                .iter()
                .filter_map(|index| {
                    let pellet = current.catalog().cell(index)?;
                    map.distance(pellet).map(|step| (index, step))
                })
                .min_by_key(|&(index, step)| (step, index))?;

            current = current.collect_index(index);
            tip = arena.push_step(tip, current.clone(), step);
        }

        Some(arena.extract(tip))
    }
}

#[cfg(test)]
mod tests {
    use pellet_maze_core::Direction;

    use super::*;

    struct Room {
        columns: u32,
        rows: u32,
        agent: CellCoord,
    }

    impl GridOracle for Room {
        fn dimensions(&self) -> (u32, u32) {
            (self.columns, self.rows)
        }

        fn is_legal_move(&self, cell: CellCoord, direction: Direction) -> bool {
            self.contains(cell) && cell.step(direction).is_some_and(|next| self.contains(next))
        }

        fn has_pellet(&self, _cell: CellCoord) -> bool {
            false
        }

        fn agent_cell(&self) -> CellCoord {
            self.agent
        }

        fn pellet_cells(&self) -> Vec<CellCoord> {
            Vec::new()
        }
    }

    fn room() -> Room {
        Room {
            columns: 6,
            rows: 1,
            agent: CellCoord::new(2, 0),
        }
    }

    #[test]
    fn greedy_is_beaten_on_a_corridor() {
        let room = room();
        let initial = PelletState::new(
            room.agent,
            [CellCoord::new(3, 0), CellCoord::new(0, 0), CellCoord::new(5, 0)],
        );
        let mut planner = PelletPlanner::default();

        let greedy = planner.plan_greedy(&room, &initial).expect("greedy order");
        let optimal = planner.plan(&room, &initial).expect("optimal order");

        // Greedy: 2 -> 3 -> 5 -> 0 = 1 + 2 + 5. Optimal: 2 -> 0 -> 3 -> 5 = 2 + 3 + 2.
        assert_eq!(greedy.cost(), 8);
        assert_eq!(optimal.cost(), 7);
        assert!(!planner.last_stats().budget_exhausted());
    }

    #[test]
    fn exhausted_budget_degrades_to_the_greedy_order() {
        let room = room();
        let initial = PelletState::new(
            room.agent,
            [CellCoord::new(3, 0), CellCoord::new(0, 0), CellCoord::new(5, 0)],
        );
        let mut planner = PelletPlanner::new(PlannerConfig::new(Some(1)));

        let path = planner.plan(&room, &initial).expect("fallback order");

        assert!(planner.last_stats().budget_exhausted());
        assert_eq!(planner.last_stats().expansions(), 1);
        assert_eq!(path.cost(), 8);
        assert!(path.destination().is_goal());
    }

    #[test]
    fn every_call_starts_from_an_empty_cache() {
        let room = room();
        let initial = PelletState::new(room.agent, [CellCoord::new(5, 0)]);
        let mut planner = PelletPlanner::default();

        let _ = planner.plan(&room, &initial);
        let first = planner.last_stats();
        let _ = planner.plan(&room, &initial);
        let second = planner.last_stats();

        assert_eq!(first, second);
        assert_eq!(first.cache_sources(), 1);
    }

    #[test]
    fn route_through_stitches_segments() {
        let room = room();
        let mut planner = PelletPlanner::default();

        let cells = planner.plan_pellet_order(&Room {
            columns: 6,
            rows: 1,
            agent: CellCoord::new(0, 0),
        });

        assert_eq!(cells, Some(Vec::new()));

        let initial = PelletState::new(CellCoord::new(0, 0), [CellCoord::new(2, 0)]);
        let path = planner.plan(&room, &initial).expect("order exists");
        assert_eq!(
            planner.route_through(&room, &path),
            Some(vec![CellCoord::new(1, 0), CellCoord::new(2, 0)])
        );
    }
}
