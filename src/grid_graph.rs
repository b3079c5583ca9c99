use core::fmt;
use fxhash::FxBuildHasher;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use itertools::iproduct;

use crate::node::GridNode;
use crate::pathfind::{self, Pathfinder};
use crate::NodeMap;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// A bounded grid world holding one walkable [GridNode] per open cell,
/// together with the flow field that [generate_paths](Self::generate_paths)
/// converges on a single target cell.
///
/// Obstacles are edited through [add_obstacle](Self::add_obstacle) and
/// [remove_obstacle](Self::remove_obstacle); once a field exists, each edit
/// repairs it locally instead of recomputing the whole grid, and the repaired
/// costs are identical to what a fresh [generate_paths](Self::generate_paths)
/// would produce.
///
/// Adjacency comes in three flavours. With `diagonals_allowed` every cell
/// connects to its full eight-cell neighbourhood, corners included. Without
/// it, `avoid_corner_cutting` decides whether diagonal edges are banned
/// outright or merely conditioned on both adjacent corner cells being open,
/// so a diagonal step never squeezes between two obstacles.
#[derive(Clone, Debug)]
pub struct GridGraph {
    width: usize,
    height: usize,
    diagonals_allowed: bool,
    avoid_corner_cutting: bool,
    nodes: NodeMap,
    target: Option<Point>,
    pathfind: Pathfinder,
}

impl GridGraph {
    /// Creates a fully walkable grid.
    pub fn new(
        width: usize,
        height: usize,
        diagonals_allowed: bool,
        avoid_corner_cutting: bool,
    ) -> GridGraph {
        GridGraph::from_obstacle_fn(width, height, diagonals_allowed, avoid_corner_cutting, |_| {
            false
        })
    }

    /// Creates a grid whose blocked cells are given by a predicate.
    pub fn from_obstacle_fn<F>(
        width: usize,
        height: usize,
        diagonals_allowed: bool,
        avoid_corner_cutting: bool,
        mut blocked: F,
    ) -> GridGraph
    where
        F: FnMut(Point) -> bool,
    {
        let mut graph = GridGraph {
            width,
            height,
            diagonals_allowed,
            avoid_corner_cutting,
            nodes: NodeMap::with_capacity_and_hasher(width * height, FxBuildHasher::default()),
            target: None,
            pathfind: Pathfinder::new(),
        };
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let point = Point::new(x, y);
                if !blocked(point) {
                    graph.insert_node(point);
                }
            }
        }
        graph
    }

    /// Creates a grid from a [BoolGrid] obstacle mask, `true` meaning blocked.
    pub fn from_bool_grid(
        blocked: &BoolGrid,
        diagonals_allowed: bool,
        avoid_corner_cutting: bool,
    ) -> GridGraph {
        GridGraph::from_obstacle_fn(
            blocked.width(),
            blocked.height(),
            diagonals_allowed,
            avoid_corner_cutting,
            |point| blocked.get(point.x, point.y),
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn diagonals_allowed(&self) -> bool {
        self.diagonals_allowed
    }

    pub fn avoid_corner_cutting(&self) -> bool {
        self.avoid_corner_cutting
    }

    /// The cell the current flow field converges on, if one exists.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.nodes.contains_key(&point)
    }

    pub fn node_at(&self, point: Point) -> Option<&GridNode> {
        self.nodes.get(&point)
    }

    /// Blocks a cell, deleting its node and every edge touching it. Blocking
    /// a cell that is already blocked or out of bounds does nothing; blocking
    /// the target invalidates the whole field. Otherwise an existing field is
    /// repaired in place.
    pub fn add_obstacle(&mut self, point: Point) {
        let Some(node) = self.nodes.swap_remove(&point) else {
            return;
        };
        for &neighbour in node.neighbours.iter() {
            if let Some(other) = self.nodes.get_mut(&neighbour) {
                other.neighbours.retain(|p| *p != point);
            }
        }
        let severed = self.sever_corner_edges(point);
        if self.target == Some(point) {
            self.target = None;
            self.pathfind.invalidate(&mut self.nodes);
        } else if self.pathfind.paths_generated() {
            self.pathfind.repair_after_removal(
                &mut self.nodes,
                point,
                node.accumulated_cost,
                &node.neighbours,
                &severed,
            );
        }
    }

    /// Opens a blocked cell, recreating its node and every edge that the
    /// current obstacle layout permits. Opening a walkable or out of bounds
    /// cell does nothing. An existing field is extended in place.
    pub fn remove_obstacle(&mut self, point: Point) {
        if !self.in_bounds(point) || self.nodes.contains_key(&point) {
            return;
        }
        let restored = self.insert_node(point);
        if self.pathfind.paths_generated() {
            self.pathfind
                .repair_after_insertion(&mut self.nodes, point, &restored);
        }
    }

    /// Blocks every cell matching the predicate, one
    /// [add_obstacle](Self::add_obstacle) at a time in row-major order.
    pub fn add_obstacles_where<F>(&mut self, mut blocked: F)
    where
        F: FnMut(Point) -> bool,
    {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let point = Point::new(x, y);
                if blocked(point) {
                    self.add_obstacle(point);
                }
            }
        }
    }

    /// Opens every cell matching the predicate, one
    /// [remove_obstacle](Self::remove_obstacle) at a time in row-major order.
    pub fn remove_obstacles_where<F>(&mut self, mut open: F)
    where
        F: FnMut(Point) -> bool,
    {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let point = Point::new(x, y);
                if open(point) {
                    self.remove_obstacle(point);
                }
            }
        }
    }

    /// Converges a flow field on `target`, replacing any previous field.
    /// Returns [false] and leaves the previous field untouched when the
    /// target cell is blocked or out of bounds.
    pub fn generate_paths(&mut self, target: Point) -> bool {
        if self.pathfind.generate_paths(&mut self.nodes, target) {
            self.target = Some(target);
            true
        } else {
            false
        }
    }

    /// The accumulated cost from a cell to the target, or [None] when the
    /// cell is blocked or unreachable or no field has been generated.
    pub fn cost_at(&self, point: Point) -> Option<f32> {
        if !self.pathfind.visited(point) {
            return None;
        }
        self.nodes.get(&point).map(|node| node.accumulated_cost)
    }

    /// Whether the field reaches the given cell. Constant time.
    pub fn has_valid_path(&self, point: Point) -> bool {
        self.pathfind.paths_generated() && self.pathfind.visited(point)
    }

    /// The route from `from` to the target, both endpoints included, obtained
    /// by walking the cost gradient downhill. Empty when no field reaches
    /// `from`.
    pub fn find_path(&self, from: Point) -> Vec<Point> {
        self.pathfind.find_path(&self.nodes, from)
    }

    /// The neighbour of `from` that is cheapest to move to, the single step
    /// an agent standing there should take. [None] when the whole
    /// neighbourhood is unreachable.
    pub fn least_cost_neighbour(&self, from: Point) -> Option<Point> {
        pathfind::least_cost_neighbour(&self.nodes, from)
    }

    /// Creates the node for a newly open cell and wires up its edges:
    /// orthogonal neighbours, legal diagonal neighbours, and any corner edge
    /// between two of its orthogonal neighbours that this cell was the last
    /// missing corner of. Returns those reconnected corner pairs.
    fn insert_node(&mut self, point: Point) -> Vec<(Point, Point)> {
        self.nodes.insert(point, GridNode::new(point));
        for (dx, dy) in ORTHOGONAL {
            let neighbour = Point::new(point.x + dx, point.y + dy);
            if self.nodes.contains_key(&neighbour) {
                self.connect(point, neighbour);
            }
        }
        for (dx, dy) in DIAGONAL {
            let neighbour = Point::new(point.x + dx, point.y + dy);
            if self.nodes.contains_key(&neighbour) && self.diagonal_edge_allowed(point, neighbour) {
                self.connect(point, neighbour);
            }
        }
        let mut restored = Vec::new();
        if !self.diagonals_allowed && self.avoid_corner_cutting {
            for (dx, dy) in iproduct!([-1, 1], [-1, 1]) {
                let a = Point::new(point.x + dx, point.y);
                let b = Point::new(point.x, point.y + dy);
                if self.nodes.contains_key(&a)
                    && self.nodes.contains_key(&b)
                    && self.diagonal_edge_allowed(a, b)
                    && !self.connected(a, b)
                {
                    self.connect(a, b);
                    restored.push((a, b));
                }
            }
        }
        restored
    }

    /// Drops every diagonal edge between pairs of orthogonal neighbours of a
    /// just-blocked cell, which was one of their two corner cells. Returns
    /// the disconnected pairs. Only applies when diagonal moves are
    /// conditioned on open corners.
    fn sever_corner_edges(&mut self, point: Point) -> Vec<(Point, Point)> {
        let mut severed = Vec::new();
        if self.diagonals_allowed || !self.avoid_corner_cutting {
            return severed;
        }
        for (dx, dy) in iproduct!([-1, 1], [-1, 1]) {
            let a = Point::new(point.x + dx, point.y);
            let b = Point::new(point.x, point.y + dy);
            if self.connected(a, b) {
                self.disconnect(a, b);
                severed.push((a, b));
            }
        }
        severed
    }

    /// Whether a diagonal edge between `a` and `b` is permitted under the
    /// current movement rules and obstacle layout.
    fn diagonal_edge_allowed(&self, a: Point, b: Point) -> bool {
        if self.diagonals_allowed {
            return true;
        }
        if !self.avoid_corner_cutting {
            return false;
        }
        self.nodes.contains_key(&Point::new(a.x, b.y))
            && self.nodes.contains_key(&Point::new(b.x, a.y))
    }

    fn connect(&mut self, a: Point, b: Point) {
        if let Some(node) = self.nodes.get_mut(&a) {
            node.neighbours.push(b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbours.push(a);
        }
    }

    fn disconnect(&mut self, a: Point, b: Point) {
        if let Some(node) = self.nodes.get_mut(&a) {
            node.neighbours.retain(|p| *p != b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbours.retain(|p| *p != a);
        }
    }

    fn connected(&self, a: Point, b: Point) -> bool {
        self.nodes
            .get(&a)
            .map_or(false, |node| node.neighbours.contains(&b))
    }
}

impl Default for GridGraph {
    fn default() -> GridGraph {
        GridGraph::new(0, 0, false, false)
    }
}

impl fmt::Display for GridGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.height as i32 {
            let values = (0..self.width as i32)
                .map(|x| (!self.is_walkable(Point::new(x, y))) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}
