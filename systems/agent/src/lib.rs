#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent system that turns planned pellet routes into one step per tick.

use std::collections::VecDeque;

use pellet_maze_core::{CellCoord, Command, Direction, Event, GridOracle};
use pellet_maze_system_pellet_planner::{PelletPlanner, PlannerConfig};
use pellet_maze_system_router::GridRouter;

/// How the agent decides where to walk next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Walk to the pellet with the smallest true grid distance, then replan.
    NearestPellet,
    /// Follow the cheapest complete collection order found by the planner.
    #[default]
    PelletOrder,
}

/// Pure system that reacts to world events and emits agent step commands.
#[derive(Debug)]
pub struct Agent {
    strategy: Strategy,
    planner: PelletPlanner,
    router: GridRouter,
    plan: VecDeque<CellCoord>,
    replans: u64,
}

impl Agent {
    /// Creates an agent that plans with the provided strategy and planner settings.
    #[must_use]
    pub fn new(strategy: Strategy, config: PlannerConfig) -> Self {
        Self {
            strategy,
            planner: PelletPlanner::new(config),
            router: GridRouter::new(),
            plan: VecDeque::new(),
            replans: 0,
        }
    }

    /// Strategy the agent plans with.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Cells still queued in the current plan, next step first.
    pub fn planned(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.plan.iter().copied()
    }

    /// Number of plans computed so far.
    #[must_use]
    pub const fn replans(&self) -> u64 {
        self.replans
    }

    /// Consumes world events and the grid view to emit at most one step command.
    ///
    /// Wall changes and rejected steps invalidate the queued plan. A step is
    /// only proposed on ticks that advance the clock.
    pub fn handle<G>(&mut self, events: &[Event], oracle: &G, out: &mut Vec<Command>)
    where
        G: GridOracle + ?Sized,
    {
        let mut advanced = false;
        for event in events {
            match event {
                Event::WallPlaced { .. }
                | Event::WallRemoved { .. }
                | Event::StepRejected { .. }
                | Event::BoardCleared => self.plan.clear(),
                Event::TimeAdvanced { .. } => advanced = true,
                _ => {}
            }
        }

        if !advanced {
            return;
        }

        if let Some(direction) = self.next_move(oracle) {
            out.push(Command::StepAgent { direction });
        }
    }

    /// Replaces the queued plan with a fresh one computed from `oracle`.
    ///
    /// Returns `false` when there is nowhere left to go.
    pub fn make_plan<G>(&mut self, oracle: &G) -> bool
    where
        G: GridOracle + ?Sized,
    {
        self.plan.clear();
        self.replans += 1;

        let cells = match self.strategy {
            Strategy::NearestPellet => self.nearest_pellet_route(oracle),
            Strategy::PelletOrder => match self.planner.plan_pellet_order(oracle) {
                Some(cells) => Some(cells),
                None => {
                    log::info!("no complete pellet order; heading for the nearest pellet");
                    self.nearest_pellet_route(oracle)
                }
            },
        };

        self.plan.extend(cells.into_iter().flatten());
        log::debug!(
            "planned {} steps with {:?} from {:?}",
            self.plan.len(),
            self.strategy,
            oracle.agent_cell()
        );
        !self.plan.is_empty()
    }

    /// Direction of the next queued step, replanning once when the plan is
    /// empty or no longer matches the board.
    pub fn next_move<G>(&mut self, oracle: &G) -> Option<Direction>
    where
        G: GridOracle + ?Sized,
    {
        for _ in 0..2 {
            if self.plan.is_empty() && !self.make_plan(oracle) {
                return None;
            }

            let current = oracle.agent_cell();
            let next = self.plan.pop_front()?;
            let direction = Direction::between(current, next)
                .filter(|direction| oracle.is_legal_move(current, *direction));
            if direction.is_some() {
                return direction;
            }

            log::debug!("discarding stale plan: {current:?} cannot step to {next:?}");
            self.plan.clear();
        }

        None
    }

    fn nearest_pellet_route<G>(&mut self, oracle: &G) -> Option<Vec<CellCoord>>
    where
        G: GridOracle + ?Sized,
    {
        let origin = oracle.agent_cell();
        let distances = self.router.flood(oracle, origin);
        let target = oracle
            .pellet_cells()
            .into_iter()
            .filter_map(|cell| distances.distance(cell).map(|distance| (distance, cell)))
            .min()?
            .1;

        self.router.find_route(oracle, origin, target)
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Strategy::default(), PlannerConfig::default())
    }
}
