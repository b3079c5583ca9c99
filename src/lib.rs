//! # grid_flowfield
//!
//! An incremental single-target pathfinding system for mutable 2-D grids. One
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) pass from
//! the target cell produces a flow field: the cost of the cheapest route to
//! the target for every reachable cell at once. Paths are then read off the
//! field by greedy descent instead of being searched for, and when obstacles
//! are added or removed the field is repaired locally rather than regenerated
//! from scratch.
pub mod grid_graph;
pub mod node;
mod pathfind;
pub mod priority_queue;

use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;

pub use crate::grid_graph::GridGraph;
pub use crate::node::GridNode;
pub use crate::priority_queue::PriorityQueue;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub(crate) type NodeMap = FxIndexMap<Point, crate::node::GridNode>;

/// Movement cost between adjacent cells. Straight and diagonal steps cost the
/// same.
pub const EDGE_COST: f32 = 1.0;

/// Sentinel accumulated cost of a cell with no route to the current target.
pub const UNREACHABLE: f32 = f32::INFINITY;
