use grid_flowfield::GridGraph;
use grid_util::point::Point;

// In this example a flow field is generated on a 5x5 grid with shape
//  _____
// |S    |
// |     |
// |  #  |
// |     |
// |    E|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end the field converges on
//
// Nodes have a 4-neighborhood

fn main() {
    let mut graph = GridGraph::new(5, 5, false, false);
    graph.add_obstacle(Point::new(2, 2));
    graph.generate_paths(Point::new(4, 4));
    println!("{}", graph);
    let start = Point::new(0, 0);
    println!("Cost from {}: {:?}", start, graph.cost_at(start));
    println!("Path:");
    for p in graph.find_path(start) {
        println!("{:?}", p);
    }
}
