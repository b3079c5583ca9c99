use grid_flowfield::GridGraph;
use grid_util::point::Point;

// In this example a flow field is generated on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end the field converges on
//
// Nodes have an 8-neighborhood and corner cutting is allowed, so the path
// slips diagonally past the obstacle.

fn main() {
    let mut graph = GridGraph::new(3, 3, true, false);
    graph.add_obstacle(Point::new(1, 1));
    graph.generate_paths(Point::new(2, 2));
    println!("{}", graph);
    let start = Point::new(0, 0);
    println!("Cost from {}: {:?}", start, graph.cost_at(start));
    println!("Path:");
    for p in graph.find_path(start) {
        println!("{:?}", p);
    }
}
