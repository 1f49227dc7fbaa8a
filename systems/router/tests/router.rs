use pellet_maze_core::{CellCoord, Direction, GridOracle};
use pellet_maze_system_router::{find_route, DistanceCache, GridRouter};
use pellet_maze_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn open_layout(columns: u32, rows: u32) -> String {
    let mut layout = String::new();
    for row in 0..rows {
        for column in 0..columns {
            layout.push(if column == 0 && row == 0 { 'P' } else { '_' });
        }
        layout.push('\n');
    }
    layout
}

fn random_layout(rng: &mut ChaCha8Rng, columns: u32, rows: u32) -> String {
    let mut layout = String::new();
    for row in 0..rows {
        for column in 0..columns {
            let tile = if column == 0 && row == 0 {
                'P'
            } else if rng.gen_bool(0.25) {
                '#'
            } else {
                '_'
            };
            layout.push(tile);
        }
        layout.push('\n');
    }
    layout
}

fn floor_cells(world: &World) -> Vec<CellCoord> {
    let (columns, rows) = query::dimensions(world);
    (0..rows)
        .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| !query::is_wall(world, *cell))
        .collect()
}

fn assert_route_is_walkable(world: &World, origin: CellCoord, route: &[CellCoord]) {
    let grid = query::grid(world);
    let mut current = origin;
    for &next in route {
        let direction =
            Direction::between(current, next).expect("route advances one cell at a time");
        assert_eq!(grid.apply_move(current, direction), Some(next));
        current = next;
    }
}

#[test]
fn open_grid_route_matches_manhattan_distance() {
    let world = World::from_layout(
        "\
P____
_____
_____
_____
____.
",
    )
    .expect("layout parses");
    let grid = query::grid(&world);
    let origin = CellCoord::new(0, 0);
    let target = CellCoord::new(4, 4);

    let route = find_route(&grid, origin, target).expect("route exists");

    assert_eq!(route.len(), 8);
    assert_eq!(route.last(), Some(&target));
    assert_route_is_walkable(&world, origin, &route);
}

#[test]
fn wall_forces_a_detour_through_the_gap() {
    let world = World::from_layout(
        "\
P____
####_
__.__
_____
_____
",
    )
    .expect("layout parses");
    let grid = query::grid(&world);
    let origin = CellCoord::new(0, 0);
    let target = CellCoord::new(2, 2);

    let route = find_route(&grid, origin, target).expect("route exists");

    assert_eq!(route.len(), 8);
    assert!(route.contains(&CellCoord::new(4, 1)));
    assert_route_is_walkable(&world, origin, &route);
}

#[test]
fn sealed_row_makes_the_far_side_unreachable() {
    let world = World::from_layout(
        "\
P____
#####
__.__
",
    )
    .expect("layout parses");
    let grid = query::grid(&world);

    assert!(find_route(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2)).is_none());

    let mut cache = DistanceCache::new();
    assert_eq!(
        cache.distance(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2)),
        None
    );
}

#[test]
fn random_open_grids_route_at_manhattan_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);
    let mut router = GridRouter::new();

    for _ in 0..40 {
        let columns = rng.gen_range(1..=9);
        let rows = rng.gen_range(1..=9);
        let world = World::from_layout(&open_layout(columns, rows)).expect("layout parses");
        let grid = query::grid(&world);

        let origin = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        let target = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        let path = router.route(&grid, origin, target).expect("open grid is connected");

        assert_eq!(path.cost(), origin.manhattan_distance(target));
        assert_eq!(path.transitions() as u32, path.cost());
        assert_eq!(*path.origin(), origin);
        assert_eq!(*path.destination(), target);
    }
}

#[test]
fn cached_distances_are_symmetric_and_agree_with_the_router() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0002);
    let mut router = GridRouter::new();
    let mut cache = DistanceCache::new();

    for _ in 0..6 {
        let world = World::from_layout(&random_layout(&mut rng, 7, 6)).expect("layout parses");
        let grid = query::grid(&world);
        let cells = floor_cells(&world);
        cache.reset();

        for &a in &cells {
            assert_eq!(cache.distance(&grid, a, a), Some(0));
            for &b in &cells {
                let forward = cache.distance(&grid, a, b);
                let backward = cache.distance(&grid, b, a);
                assert_eq!(forward, backward, "asymmetric distance between {a:?} and {b:?}");

                let routed = router.route(&grid, a, b).map(|path| path.cost());
                assert_eq!(forward, routed);
            }
        }

        assert_eq!(cache.sources(), cells.len());
    }
}
