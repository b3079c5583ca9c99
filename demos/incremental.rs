use grid_flowfield::GridGraph;
use grid_util::point::Point;

// A wall splits a 7x5 grid in two, with a door at (3, 2):
//  _______
// |   #   |
// |   #   |
// |S     E|
// |   #   |
// |   #   |
//  _______
// The field is generated once. Closing and reopening the door repairs it in
// place, and an agent follows the repaired field one step at a time.

fn main() {
    let mut graph = GridGraph::new(7, 5, false, false);
    graph.add_obstacles_where(|p| p.x == 3 && p.y != 2);
    graph.generate_paths(Point::new(6, 2));
    println!("{}", graph);

    let start = Point::new(0, 2);
    println!("Door open: cost {:?}", graph.cost_at(start));
    graph.add_obstacle(Point::new(3, 2));
    println!("Door closed: cost {:?}", graph.cost_at(start));
    graph.remove_obstacle(Point::new(3, 2));
    println!("Door reopened: cost {:?}", graph.cost_at(start));

    let mut agent = start;
    print!("{}", agent);
    while graph.cost_at(agent) != Some(0.0) {
        let Some(next) = graph.least_cost_neighbour(agent) else {
            break;
        };
        print!(" -> {}", next);
        agent = next;
    }
    println!();
}
