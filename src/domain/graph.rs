//! Directed weighted location graph.
//!
//! Nodes keep their insertion order, which is the iteration order every
//! downstream stage relies on for tie-breaking. Adding an edge that already
//! exists overwrites its weight.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;
use tracing::debug;

use crate::domain::types::Location;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight {
        from: Location,
        to: Location,
        weight: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    nodes: Vec<Location>,
    index: HashMap<Location, usize>,
    adjacency: Vec<Vec<Edge>>,
}

impl LocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph where every `(origin, destination, weight)` is inserted
    /// in both directions with the same weight.
    pub fn from_symmetric_routes(routes: &[(&str, &str, f64)]) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for &(origin, destination, weight) in routes {
            graph.add_edge(origin, destination, weight)?;
            graph.add_edge(destination, origin, weight)?;
        }
        debug!(
            "Built graph with {} nodes and {} directed edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Returns the node index, inserting the node if it is new.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.adjacency.push(vec![]);
        idx
    }

    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) -> Result<(), GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }
        let u = self.add_node(from);
        let v = self.add_node(to);
        self.insert_edge(u, v, weight);
        Ok(())
    }

    /// Inserts or overwrites `u -> v`. The weight must already be finite.
    fn insert_edge(&mut self, u: usize, v: usize, weight: f64) {
        match self.adjacency[u].iter_mut().find(|e| e.to == v) {
            Some(edge) => edge.weight = weight,
            None => self.adjacency[u].push(Edge { to: v, weight }),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[Location] {
        &self.nodes
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn neighbours(&self, idx: usize) -> &[Edge] {
        &self.adjacency[idx]
    }

    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        let u = self.index_of(from)?;
        let v = self.index_of(to)?;
        self.adjacency[u].iter().find(|e| e.to == v).map(|e| e.weight)
    }

    /// All directed edges as `(from, to, weight)` in node then insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(u, edges)| {
            edges
                .iter()
                .map(move |e| (self.nodes[u].as_str(), self.nodes[e.to].as_str(), e.weight))
        })
    }

    /// Graph over `keep` (in that order) with every edge whose endpoints are both kept.
    /// Names absent from `self` become isolated nodes.
    pub fn induced_subgraph(&self, keep: &[Location]) -> LocationGraph {
        let mut sub = LocationGraph::new();
        for name in keep {
            sub.add_node(name);
        }
        for (from, to, weight) in self.edges() {
            if let (Some(u), Some(v)) = (sub.index_of(from), sub.index_of(to)) {
                sub.insert_edge(u, v, weight);
            }
        }
        sub
    }

    /// Reachability mask from `source`, the source included.
    pub fn reachable_from(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.node_count()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;
        while let Some(u) = queue.pop_front() {
            for e in &self.adjacency[u] {
                if !seen[e.to] {
                    seen[e.to] = true;
                    queue.push_back(e.to);
                }
            }
        }
        seen
    }
}
