use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use thiserror::Error;

use crate::domain::graph::LocationGraph;
use crate::domain::types::Location;

#[derive(Debug, Error, PartialEq)]
pub enum ShortestPathError {
    #[error("negative cycle reachable from {origin}")]
    NegativeCycle {
        origin: Location,
        /// State after the last round. Entries of unaffected nodes are exact.
        tree: ShortestPathTree,
        /// Nodes whose distance is unbounded below: those still relaxable after
        /// |R|-1 rounds and everything reachable from them.
        affected: Vec<bool>,
    },
}

/// Single-source distances and predecessor links.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    pub source: usize,
    pub distances: Vec<f64>,
    pub predecessors: Vec<Option<usize>>,
}

impl ShortestPathTree {
    fn empty(source: usize, n: usize) -> Self {
        let mut distances = vec![f64::INFINITY; n];
        distances[source] = 0.0;
        Self {
            source,
            distances,
            predecessors: vec![None; n],
        }
    }

    pub fn distance(&self, target: usize) -> f64 {
        self.distances[target]
    }

    /// Node indices from the source to `target`, or `None` if unreachable.
    pub fn path(&self, target: usize) -> Option<Vec<usize>> {
        if !self.distances[target].is_finite() {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.predecessors[current]?;
            path.push(current);
            // predecessor links must form a tree
            if path.len() > self.distances.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

/// Bellman-Ford with early exit, restricted to the nodes reachable from
/// `source`. A relaxation that still succeeds after |R|-1 rounds (R being the
/// reachable set) means a reachable negative cycle.
pub fn bellman_ford(
    graph: &LocationGraph,
    source: usize,
) -> Result<ShortestPathTree, ShortestPathError> {
    let n = graph.node_count();
    let mut tree = ShortestPathTree::empty(source, n);
    let reachable: Vec<usize> = graph
        .reachable_from(source)
        .into_iter()
        .enumerate()
        .filter_map(|(i, r)| r.then_some(i))
        .collect();

    for _ in 1..reachable.len() {
        let mut changed = false;
        for &u in &reachable {
            let du = tree.distances[u];
            if !du.is_finite() {
                continue;
            }
            for e in graph.neighbours(u) {
                if du + e.weight < tree.distances[e.to] {
                    tree.distances[e.to] = du + e.weight;
                    tree.predecessors[e.to] = Some(u);
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(tree);
        }
    }

    let mut affected = vec![false; n];
    let mut queue = VecDeque::new();
    for &u in &reachable {
        let du = tree.distances[u];
        if !du.is_finite() {
            continue;
        }
        for e in graph.neighbours(u) {
            if du + e.weight < tree.distances[e.to] && !affected[e.to] {
                affected[e.to] = true;
                queue.push_back(e.to);
            }
        }
    }

    if queue.is_empty() {
        return Ok(tree);
    }

    while let Some(u) = queue.pop_front() {
        for e in graph.neighbours(u) {
            if !affected[e.to] {
                affected[e.to] = true;
                queue.push_back(e.to);
            }
        }
    }

    Err(ShortestPathError::NegativeCycle {
        origin: graph.name(source).to_string(),
        tree,
        affected,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

// Reversed so BinaryHeap pops the cheapest state first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Label-setting Dijkstra. Each node is settled once, so it terminates on any
/// input, but distances are only exact for non-negative weights.
pub fn dijkstra(graph: &LocationGraph, source: usize) -> ShortestPathTree {
    let n = graph.node_count();
    let mut tree = ShortestPathTree::empty(source, n);
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::from([State {
        cost: 0.0,
        node: source,
    }]);

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;
        for e in graph.neighbours(node) {
            if settled[e.to] {
                continue;
            }
            let next = cost + e.weight;
            if next < tree.distances[e.to] {
                tree.distances[e.to] = next;
                tree.predecessors[e.to] = Some(node);
                heap.push(State {
                    cost: next,
                    node: e.to,
                });
            }
        }
    }

    tree
}
