use grid_flowfield::GridGraph;
use grid_util::point::Point;

// The same 3x3 map twice, converging on the bottom right corner:
//  ___
// |S  |
// | # |
// |  E|
//  ___
// With diagonals allowed the route squeezes past the obstacle corner and
// takes 3 steps. With corner cutting avoided every diagonal move needs both
// adjacent corners open, so the route goes around in 4.

fn report(label: &str, graph: &GridGraph) {
    let start = Point::new(0, 0);
    println!(
        "{}: cost {:?}, path {:?}",
        label,
        graph.cost_at(start),
        graph.find_path(start)
    );
}

fn main() {
    let mut cutting = GridGraph::new(3, 3, true, false);
    cutting.add_obstacle(Point::new(1, 1));
    cutting.generate_paths(Point::new(2, 2));
    report("corner cutting", &cutting);

    let mut careful = GridGraph::new(3, 3, false, true);
    careful.add_obstacle(Point::new(1, 1));
    careful.generate_paths(Point::new(2, 2));
    report("corners respected", &careful);
}
