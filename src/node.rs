use grid_util::point::Point;
use smallvec::SmallVec;

use crate::{EDGE_COST, UNREACHABLE};

/// A single walkable cell of a [GridGraph](crate::GridGraph): its position,
/// the neighbouring cells it connects to, and the cost of the cheapest known
/// route from it to the current target. Nodes exist only where cells are
/// walkable and adjacency is symmetric; both are maintained by the owning
/// graph.
#[derive(Clone, Debug)]
pub struct GridNode {
    pub(crate) position: Point,
    pub(crate) neighbours: SmallVec<[Point; 8]>,
    pub(crate) accumulated_cost: f32,
}

impl GridNode {
    pub(crate) fn new(position: Point) -> GridNode {
        GridNode {
            position,
            neighbours: SmallVec::new(),
            accumulated_cost: UNREACHABLE,
        }
    }

    /// The cell this node occupies.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The cells this node connects to.
    pub fn neighbours(&self) -> &[Point] {
        &self.neighbours
    }

    /// Cost of the cheapest known route from this cell to the target, or
    /// [UNREACHABLE] when there is none or no field has been generated yet.
    pub fn accumulated_cost(&self) -> f32 {
        self.accumulated_cost
    }

    /// Movement cost to an adjacent cell.
    pub fn edge_cost(&self, _to: Point) -> f32 {
        EDGE_COST
    }

    /// Neighbouring cells paired with the cost of stepping to them.
    pub(crate) fn neighbour_costs(&self) -> SmallVec<[(Point, f32); 8]> {
        self.neighbours
            .iter()
            .map(|&neighbour| (neighbour, self.edge_cost(neighbour)))
            .collect()
    }
}
