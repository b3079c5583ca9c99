use fxhash::FxHashSet;
use grid_util::point::Point;
use log::{info, warn};

use crate::priority_queue::PriorityQueue;
use crate::{NodeMap, UNREACHABLE};

/// Target-convergent Dijkstra machinery: the visited bookkeeping, the full
/// propagation pass, greedy path reconstruction, and the localized repairs
/// that keep the field exact while obstacles are toggled. Driven by
/// [GridGraph](crate::GridGraph), which owns the node storage.
///
/// Invariant maintained throughout: a cell is in `visited` exactly when its
/// node carries a finite accumulated cost.
#[derive(Clone, Debug)]
pub(crate) struct Pathfinder {
    visited: FxHashSet<Point>,
    paths_generated: bool,
}

impl Pathfinder {
    pub(crate) fn new() -> Pathfinder {
        Pathfinder {
            visited: FxHashSet::default(),
            paths_generated: false,
        }
    }

    pub(crate) fn paths_generated(&self) -> bool {
        self.paths_generated
    }

    pub(crate) fn visited(&self, point: Point) -> bool {
        self.visited.contains(&point)
    }

    /// Full Dijkstra pass from `target` outward over the whole graph.
    /// Returns [false] without touching anything when `target` has no node.
    pub(crate) fn generate_paths(&mut self, nodes: &mut NodeMap, target: Point) -> bool {
        if !nodes.contains_key(&target) {
            warn!("No node at {} to converge on, keeping the old field", target);
            return false;
        }
        info!("Generating flow field converging on {}", target);
        self.visited.clear();
        for (_, node) in nodes.iter_mut() {
            node.accumulated_cost = UNREACHABLE;
        }
        if let Some(node) = nodes.get_mut(&target) {
            node.accumulated_cost = 0.0;
        }
        self.visited.insert(target);
        let mut frontier = PriorityQueue::new();
        frontier.enqueue(target, 0.0);
        self.relax(nodes, &mut frontier);
        self.paths_generated = true;
        info!(
            "Flow field reaches {} of {} walkable cells",
            self.visited.len(),
            nodes.len()
        );
        true
    }

    /// The shared relaxation loop: pops the cheapest frontier cell and offers
    /// its cost plus the edge cost to every neighbour, claiming any neighbour
    /// that is unvisited or improves on its current cost. Duplicate frontier
    /// entries are benign: a stale pop re-offers the node's current, only
    /// ever lower, cost.
    fn relax(&mut self, nodes: &mut NodeMap, frontier: &mut PriorityQueue<Point>) {
        while let Some(current) = frontier.dequeue() {
            let Some(node) = nodes.get(&current) else {
                debug_assert!(false, "frontier entry {} has no node", current);
                continue;
            };
            let current_cost = node.accumulated_cost;
            for (neighbour, step) in node.neighbour_costs() {
                let tentative = current_cost + step;
                let Some(next) = nodes.get_mut(&neighbour) else {
                    debug_assert!(false, "{} is adjacent to missing node {}", current, neighbour);
                    continue;
                };
                if !self.visited.contains(&neighbour) || tentative < next.accumulated_cost {
                    next.accumulated_cost = tentative;
                    self.visited.insert(neighbour);
                    frontier.enqueue(neighbour, tentative);
                }
            }
        }
    }

    /// Repairs the field after the node at `removed` (which carried
    /// `removed_cost` and the adjacency `former_neighbours`) was deleted,
    /// along with the additionally `severed` corner edges. Clears every cell
    /// whose cheapest route may have run through a lost edge, then re-relaxes
    /// the cleared region from its surviving boundary.
    pub(crate) fn repair_after_removal(
        &mut self,
        nodes: &mut NodeMap,
        removed: Point,
        removed_cost: f32,
        former_neighbours: &[Point],
        severed: &[(Point, Point)],
    ) {
        if !self.visited.remove(&removed) {
            // The cell was unreachable; nothing routed through it.
            return;
        }
        // A neighbour strictly more expensive than the lost cell or lost edge
        // endpoint may have routed through it; anything cheaper cannot have.
        let mut cleared: Vec<Point> = Vec::new();
        for &neighbour in former_neighbours {
            if self.visited.contains(&neighbour) && cost_of(nodes, neighbour) > removed_cost {
                self.visited.remove(&neighbour);
                cleared.push(neighbour);
            }
        }
        for &(a, b) in severed {
            let cost_a = cost_of(nodes, a);
            let cost_b = cost_of(nodes, b);
            if cost_a > cost_b && self.visited.contains(&a) {
                self.visited.remove(&a);
                cleared.push(a);
            }
            if cost_b > cost_a && self.visited.contains(&b) {
                self.visited.remove(&b);
                cleared.push(b);
            }
        }
        // Breadth expansion over strictly increasing costs. Costs are left in
        // place during the sweep; the comparisons below all want the values
        // from before the edit.
        let mut head = 0;
        while head < cleared.len() {
            let current = cleared[head];
            head += 1;
            let Some(node) = nodes.get(&current) else {
                debug_assert!(false, "cleared cell {} has no node", current);
                continue;
            };
            let current_cost = node.accumulated_cost;
            for &neighbour in node.neighbours.iter() {
                if self.visited.contains(&neighbour) && cost_of(nodes, neighbour) > current_cost {
                    self.visited.remove(&neighbour);
                    cleared.push(neighbour);
                }
            }
        }
        if cleared.is_empty() {
            return;
        }
        info!("Blocking {} cleared {} cells", removed, cleared.len());
        // Forget the invalidated costs, then reflow the region from its
        // boundary. A still-visited neighbour of a cleared cell kept all of
        // its cheapest routes, so its cost is exact and seeds the frontier.
        for &cell in &cleared {
            if let Some(node) = nodes.get_mut(&cell) {
                node.accumulated_cost = UNREACHABLE;
            }
        }
        let mut frontier = PriorityQueue::new();
        for &cell in &cleared {
            let Some(node) = nodes.get(&cell) else {
                continue;
            };
            for &neighbour in node.neighbours.iter() {
                if self.visited.contains(&neighbour) {
                    frontier.enqueue(neighbour, cost_of(nodes, neighbour));
                }
            }
        }
        self.relax(nodes, &mut frontier);
    }

    /// Extends the field after a node was created at `inserted`, along with
    /// the `restored` corner edges. New edges only ever shorten routes, so
    /// nothing needs clearing: seed the frontier with the new cell, costed
    /// through its cheapest reachable neighbour, plus the endpoints of every
    /// restored edge, and let the improvement wave run out.
    pub(crate) fn repair_after_insertion(
        &mut self,
        nodes: &mut NodeMap,
        inserted: Point,
        restored: &[(Point, Point)],
    ) {
        let Some(node) = nodes.get(&inserted) else {
            debug_assert!(false, "inserted cell {} has no node", inserted);
            return;
        };
        let best = node
            .neighbour_costs()
            .into_iter()
            .filter(|(neighbour, _)| self.visited.contains(neighbour))
            .map(|(neighbour, step)| cost_of(nodes, neighbour) + step)
            .min_by(f32::total_cmp);
        let mut frontier = PriorityQueue::new();
        if let Some(cost) = best {
            if let Some(node) = nodes.get_mut(&inserted) {
                node.accumulated_cost = cost;
            }
            self.visited.insert(inserted);
            frontier.enqueue(inserted, cost);
        }
        for &(a, b) in restored {
            for endpoint in [a, b] {
                if self.visited.contains(&endpoint) {
                    frontier.enqueue(endpoint, cost_of(nodes, endpoint));
                }
            }
        }
        self.relax(nodes, &mut frontier);
    }

    /// Forgets the whole field. Used when the target cell itself is removed:
    /// queries behave as before the first propagation until a new target is
    /// set.
    pub(crate) fn invalidate(&mut self, nodes: &mut NodeMap) {
        info!("Target removed, dropping the flow field");
        self.visited.clear();
        for (_, node) in nodes.iter_mut() {
            node.accumulated_cost = UNREACHABLE;
        }
        self.paths_generated = false;
    }

    /// Reconstructs the route from `from` to the target by walking the cost
    /// gradient downhill, both endpoints included. Empty when the cell is
    /// blocked, unreachable, or no field exists.
    pub(crate) fn find_path(&self, nodes: &NodeMap, from: Point) -> Vec<Point> {
        if !self.visited.contains(&from) {
            return Vec::new();
        }
        let Some(start) = nodes.get(&from) else {
            debug_assert!(false, "visited cell {} has no node", from);
            return Vec::new();
        };
        let mut current_cost = start.accumulated_cost;
        if current_cost == 0.0 {
            return vec![from];
        }
        // Cost equals path length under unit edges, so the exact capacity is
        // known up front.
        let mut path = Vec::with_capacity(current_cost as usize + 1);
        path.push(from);
        let mut current = from;
        while current_cost > 0.0 {
            let Some(next) = least_cost_neighbour(nodes, current) else {
                debug_assert!(
                    false,
                    "cell {} costs {} but has no reachable neighbour",
                    current, current_cost
                );
                break;
            };
            let next_cost = cost_of(nodes, next);
            if next_cost >= current_cost {
                debug_assert!(
                    false,
                    "field is not monotone at {}: {} to {}",
                    current, current_cost, next_cost
                );
                break;
            }
            path.push(next);
            current = next;
            current_cost = next_cost;
        }
        path
    }
}

/// The neighbour of `point` with the cheapest route to the target, skipping
/// unreachable neighbours. [None] for missing or isolated cells and for
/// cells whose whole neighbourhood is unreachable.
pub(crate) fn least_cost_neighbour(nodes: &NodeMap, point: Point) -> Option<Point> {
    let node = nodes.get(&point)?;
    node.neighbours
        .iter()
        .copied()
        .filter(|&neighbour| cost_of(nodes, neighbour).is_finite())
        .min_by(|a, b| cost_of(nodes, *a).total_cmp(&cost_of(nodes, *b)))
}

pub(crate) fn cost_of(nodes: &NodeMap, point: Point) -> f32 {
    nodes
        .get(&point)
        .map_or(UNREACHABLE, |node| node.accumulated_cost)
}
