use pellet_maze_core::{CellCoord, Direction, GridOracle, PelletState};
use pellet_maze_system_pellet_planner::{PelletPlanner, PlannerConfig};
use pellet_maze_system_router::DistanceCache;
use pellet_maze_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn world(layout: &str) -> World {
    World::from_layout(layout).expect("layout parses")
}

fn initial_state(world: &World) -> PelletState {
    PelletState::new(query::agent_cell(world), query::pellet_cells(world))
}

fn random_world(rng: &mut ChaCha8Rng, columns: u32, rows: u32, pellets: usize) -> World {
    let mut tiles = vec!['_'; (columns * rows) as usize];
    for tile in tiles.iter_mut() {
        if rng.gen_bool(0.2) {
            *tile = '#';
        }
    }
    tiles[0] = 'P';

    let mut placed = 0;
    while placed < pellets {
        let index = rng.gen_range(1..tiles.len());
        if tiles[index] != '.' {
            tiles[index] = '.';
            placed += 1;
        }
    }

    let mut layout = String::new();
    for row in tiles.chunks(columns as usize) {
        layout.extend(row);
        layout.push('\n');
    }
    world(&layout)
}

fn brute_force_cost<G: GridOracle>(grid: &G, initial: &PelletState) -> Option<u32> {
    fn visit<G: GridOracle>(
        grid: &G,
        cache: &mut DistanceCache,
        position: CellCoord,
        remaining: &mut Vec<CellCoord>,
    ) -> Option<u32> {
        if remaining.is_empty() {
            return Some(0);
        }

        let mut best: Option<u32> = None;
        for index in 0..remaining.len() {
            let pellet = remaining.remove(index);
            let tail = cache
                .distance(grid, position, pellet)
                .and_then(|step| Some(step + visit(grid, cache, pellet, remaining)?));
            remaining.insert(index, pellet);
            if let Some(total) = tail {
                best = Some(best.map_or(total, |current| current.min(total)));
            }
        }
        best
    }

    let mut cache = DistanceCache::new();
    let mut remaining: Vec<CellCoord> = initial.remaining().collect();
    visit(grid, &mut cache, initial.position(), &mut remaining)
}

#[test]
fn two_adjacent_pellets_cost_three_in_either_order() {
    let world = world(
        "\
P.___
.____
_____
",
    );
    let grid = query::grid(&world);
    let initial = initial_state(&world);
    let mut planner = PelletPlanner::default();

    let path = planner.plan(&grid, &initial).expect("order exists");

    assert_eq!(path.cost(), 3);
    assert!(path.destination().is_goal());
    assert_eq!(path.transitions(), 2);

    let origin = query::agent_cell(&world);
    let (east, south) = (CellCoord::new(1, 0), CellCoord::new(0, 1));
    let mut cache = DistanceCache::new();
    let east_first = cache
        .distance(&grid, origin, east)
        .zip(cache.distance(&grid, east, south));
    let south_first = cache
        .distance(&grid, origin, south)
        .zip(cache.distance(&grid, south, east));
    assert_eq!(east_first.map(|(a, b)| a + b), Some(3));
    assert_eq!(south_first.map(|(a, b)| a + b), Some(3));

    let greedy = planner.plan_greedy(&grid, &initial).expect("order exists");
    assert_eq!(greedy.cost(), path.cost());
    assert_eq!(brute_force_cost(&grid, &initial), Some(3));
}

#[test]
fn enclosed_pellet_leaves_no_complete_order() {
    let world = world(
        "\
P____
___#_
__#.#
___#_
",
    );
    let grid = query::grid(&world);
    let mut planner = PelletPlanner::default();

    assert!(planner.plan(&grid, &initial_state(&world)).is_none());
    assert!(planner.plan_pellet_order(&grid).is_none());
    assert!(planner.plan_greedy(&grid, &initial_state(&world)).is_none());
}

#[test]
fn cleared_board_plans_a_single_zero_cost_state() {
    let world = world(
        "\
P__
___
",
    );
    let grid = query::grid(&world);
    let mut planner = PelletPlanner::default();

    let path = planner
        .plan(&grid, &initial_state(&world))
        .expect("goal already satisfied");

    assert_eq!(path.cost(), 0);
    assert_eq!(path.transitions(), 0);
    assert!(path.destination().is_goal());
    assert_eq!(planner.plan_pellet_order(&grid), Some(Vec::new()));
}

#[test]
fn pellet_order_walks_every_pellet_along_legal_moves() {
    let world = world(
        "\
#########
#P  .  .#
# ### # #
#.  #  .#
#########
",
    );
    let grid = query::grid(&world);
    let mut planner = PelletPlanner::new(PlannerConfig::new(None));

    let cells = planner.plan_pellet_order(&grid).expect("order exists");
    let cost = planner
        .plan(&grid, &initial_state(&world))
        .expect("order exists")
        .cost();

    assert_eq!(cells.len(), cost as usize);
    let mut current = query::agent_cell(&world);
    for &next in &cells {
        let direction = Direction::between(current, next).expect("adjacent step");
        assert_eq!(grid.apply_move(current, direction), Some(next));
        current = next;
    }
    for pellet in query::pellet_cells(&world) {
        assert!(cells.contains(&pellet), "pellet {pellet:?} never visited");
    }
}

#[test]
fn remaining_pellets_shrink_by_one_per_transition() {
    let world = world(
        "\
P__.__
_##_._
_.__#_
.__.__
",
    );
    let grid = query::grid(&world);
    let mut planner = PelletPlanner::new(PlannerConfig::new(None));

    let path = planner
        .plan(&grid, &initial_state(&world))
        .expect("order exists");
    let states = path.states();
    assert_eq!(states.len(), 6);

    for pair in states.windows(2) {
        assert_eq!(pair[1].remaining_len() + 1, pair[0].remaining_len());
        assert!(pair[0].holds(pair[1].position()));
        assert!(pair[1].remaining().all(|pellet| pair[0].holds(pellet)));
    }
}

#[test]
fn planned_cost_never_exceeds_greedy_and_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x0bde_0002);
    let mut planner = PelletPlanner::new(PlannerConfig::new(None));

    for _ in 0..25 {
        let pellets = rng.gen_range(1..=5);
        let world = random_world(&mut rng, 6, 6, pellets);
        let grid = query::grid(&world);
        let initial = initial_state(&world);

        let optimal = planner.plan(&grid, &initial).map(|path| path.cost());
        let greedy = planner.plan_greedy(&grid, &initial).map(|path| path.cost());
        let exhaustive = brute_force_cost(&grid, &initial);

        assert_eq!(optimal, exhaustive);
        assert_eq!(optimal.is_some(), greedy.is_some());
        if let (Some(optimal), Some(greedy)) = (optimal, greedy) {
            assert!(optimal <= greedy, "A* cost {optimal} above greedy {greedy}");
        }
    }
}

#[test]
fn structurally_equal_initial_states_plan_equal_costs() {
    let world = world(
        "\
P_____
_##_._
_.__#_
___.__
",
    );
    let grid = query::grid(&world);
    let mut pellets = query::pellet_cells(&world);
    let forward = PelletState::new(query::agent_cell(&world), pellets.clone());
    pellets.reverse();
    let backward = PelletState::new(query::agent_cell(&world), pellets);
    assert_eq!(forward, backward);

    let mut planner = PelletPlanner::default();
    let first = planner.plan(&grid, &forward).expect("order exists");
    let second = planner.plan(&grid, &backward).expect("order exists");

    assert_eq!(first.cost(), second.cost());
}
