/// Fuzzes the incremental repair machinery by checking on many random grids
/// that toggling obstacles one at a time leaves exactly the field a full
/// regeneration would produce. All movement settings are tested.
use grid_flowfield::GridGraph;
use grid_util::*;
use itertools::Itertools;
use rand::prelude::*;

fn random_graph(n: usize, rng: &mut StdRng, diagonals: bool, corners: bool) -> GridGraph {
    GridGraph::from_obstacle_fn(n, n, diagonals, corners, |_| rng.gen_bool(0.25))
}

fn random_point(n: usize, rng: &mut StdRng) -> Point {
    Point::new(rng.gen_range(0..n) as i32, rng.gen_range(0..n) as i32)
}

fn random_walkable(graph: &GridGraph, rng: &mut StdRng) -> Option<Point> {
    let n = graph.width();
    (0..100)
        .map(|_| random_point(n, rng))
        .find(|point| graph.is_walkable(*point))
}

fn regenerated_twin(graph: &GridGraph) -> GridGraph {
    let mut twin = GridGraph::from_obstacle_fn(
        graph.width(),
        graph.height(),
        graph.diagonals_allowed(),
        graph.avoid_corner_cutting(),
        |point| !graph.is_walkable(point),
    );
    if let Some(target) = graph.target() {
        assert!(twin.generate_paths(target));
    }
    twin
}

fn visualize_graph(graph: &GridGraph, target: &Point) {
    for y in (0..graph.height() as i32).rev() {
        for x in 0..graph.width() as i32 {
            let p = Point::new(x, y);
            if *target == p {
                print!("G");
            } else if !graph.is_walkable(p) {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

fn assert_fields_match(repaired: &GridGraph, fresh: &GridGraph, target: &Point) {
    for y in 0..repaired.height() as i32 {
        for x in 0..repaired.width() as i32 {
            let p = Point::new(x, y);
            // Show the grid if the repaired field diverged
            if repaired.cost_at(p) != fresh.cost_at(p) {
                println!(
                    "Mismatch at {}: repaired {:?}, regenerated {:?}",
                    p,
                    repaired.cost_at(p),
                    fresh.cost_at(p)
                );
                visualize_graph(repaired, target);
            }
            assert_eq!(repaired.cost_at(p), fresh.cost_at(p));
            assert_eq!(repaired.has_valid_path(p), fresh.has_valid_path(p));
        }
    }
}

/// Checks the properties any converged field must have: costs that descend
/// by exactly one along the gradient, paths that run from the queried cell
/// to the target over real edges, and no diagonal step squeezing between
/// two obstacles when corner cutting is disallowed.
fn assert_field_invariants(graph: &GridGraph) {
    let Some(target) = graph.target() else {
        return;
    };
    let check_corners = graph.avoid_corner_cutting() && !graph.diagonals_allowed();
    for y in 0..graph.height() as i32 {
        for x in 0..graph.width() as i32 {
            let p = Point::new(x, y);
            let Some(cost) = graph.cost_at(p) else {
                assert!(graph.find_path(p).is_empty());
                continue;
            };
            if p == target {
                assert_eq!(cost, 0.0);
                continue;
            }
            let node = graph.node_at(p).unwrap();
            let least = node
                .neighbours()
                .iter()
                .filter_map(|neighbour| graph.cost_at(*neighbour))
                .fold(f32::INFINITY, f32::min);
            assert_eq!(cost, least + 1.0);

            let path = graph.find_path(p);
            assert_eq!(path.first(), Some(&p));
            assert_eq!(path.last(), Some(&target));
            assert_eq!(path.len(), cost as usize + 1);
            for (a, b) in path.iter().tuple_windows() {
                assert!(graph.node_at(*a).unwrap().neighbours().contains(b));
                assert!(graph.cost_at(*b).unwrap() < graph.cost_at(*a).unwrap());
                if check_corners && a.x != b.x && a.y != b.y {
                    assert!(graph.is_walkable(Point::new(a.x, b.y)));
                    assert!(graph.is_walkable(Point::new(b.x, a.y)));
                }
            }
        }
    }
}

#[test]
fn fuzz_incremental_repairs() {
    const N: usize = 10;
    const N_ROUNDS: usize = 60;
    const N_EDITS: usize = 40;
    let mut rng = StdRng::seed_from_u64(0);
    for (diagonals, corners) in [(false, false), (false, true), (true, false)] {
        for _ in 0..N_ROUNDS {
            let mut graph = random_graph(N, &mut rng, diagonals, corners);
            let Some(target) = random_walkable(&graph, &mut rng) else {
                continue;
            };
            assert!(graph.generate_paths(target));
            for _ in 0..N_EDITS {
                let point = random_point(N, &mut rng);
                if graph.is_walkable(point) {
                    graph.add_obstacle(point);
                } else {
                    graph.remove_obstacle(point);
                }
                if graph.target().is_none() {
                    // The edit hit the target itself; converge on a new one.
                    match random_walkable(&graph, &mut rng) {
                        Some(next) => assert!(graph.generate_paths(next)),
                        None => continue,
                    }
                }
                let twin = regenerated_twin(&graph);
                if let Some(current) = graph.target() {
                    assert_fields_match(&graph, &twin, &current);
                    assert_field_invariants(&graph);
                }
            }
        }
    }
}

#[test]
fn bulk_edits_match_fresh_construction() {
    let mut graph = GridGraph::new(8, 8, false, true);
    graph.add_obstacles_where(|point| point.x == 3 && point.y != 6);
    assert!(graph.generate_paths(Point::new(7, 7)));
    graph.remove_obstacles_where(|point| point.x == 3 && point.y < 2);
    let twin = regenerated_twin(&graph);
    assert_fields_match(&graph, &twin, &Point::new(7, 7));
    assert_field_invariants(&graph);
}
