use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::graph::LocationGraph;
use crate::domain::types::Location;

/// Dense all-pairs distance matrix, row-major, labelled by location.
/// Unreachable pairs hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    nodes: Vec<Location>,
    index: HashMap<Location, usize>,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Matrix over `nodes` with zero diagonal and every other entry unreachable.
    pub fn new(nodes: &[Location]) -> Self {
        let size = nodes.len();
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self {
            nodes: nodes.to_vec(),
            index: nodes.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Location] {
        &self.nodes
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size() + to]
    }

    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        let size = self.size();
        self.data[from * size + to] = distance;
    }

    /// Distance by name; unknown locations are treated as unreachable.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        match (self.index_of(from), self.index_of(to)) {
            (Some(u), Some(v)) => self.get(u, v),
            _ => f64::INFINITY,
        }
    }

    /// A negative diagonal entry means some cycle through that node is negative.
    pub fn has_negative_cycle(&self) -> bool {
        (0..self.size()).any(|i| self.get(i, i) < 0.0)
    }
}

/// All-pairs shortest distances by triple-nested relaxation.
pub fn floyd_warshall(graph: &LocationGraph) -> DistanceMatrix {
    let n = graph.node_count();
    info!("Computing all-pairs distances over {} locations", n);

    let mut dm = DistanceMatrix::new(graph.nodes());
    for u in 0..n {
        for e in graph.neighbours(u) {
            if e.weight < dm.get(u, e.to) {
                dm.set(u, e.to, e.weight);
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let dik = dm.get(i, k);
            if !dik.is_finite() {
                continue;
            }
            for j in 0..n {
                let candidate = dik + dm.get(k, j);
                if candidate < dm.get(i, j) {
                    dm.set(i, j, candidate);
                }
            }
        }
    }

    dm
}

pub fn print_dist_matrix(dm: &DistanceMatrix) {
    debug!("Distance matrix:");
    for (i, name) in dm.nodes().iter().enumerate() {
        let row: Vec<f64> = (0..dm.size()).map(|j| dm.get(i, j)).collect();
        debug!("{}: {:?}", name, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_warshall_sample() {
        let g = LocationGraph::from_symmetric_routes(&[
            ("Norte", "A", 4.0),
            ("Norte", "B", 6.0),
            ("Centro", "B", 3.0),
            ("A", "B", 2.0),
        ])
        .unwrap();
        let dm = floyd_warshall(&g);
        assert_eq!(dm.size(), 4);
        assert_eq!(dm.distance("Centro", "B"), 3.0);
        assert_eq!(dm.distance("Norte", "B"), 6.0);
        assert_eq!(dm.distance("Centro", "A"), 5.0);
        assert_eq!(dm.distance("Norte", "Centro"), 9.0);
        assert_eq!(dm.distance("A", "A"), 0.0);
        assert!(!dm.has_negative_cycle());
    }

    #[test]
    fn test_unreachable_pairs_are_infinite() {
        let mut g = LocationGraph::new();
        g.add_edge("a", "b", 1.0).unwrap();
        g.add_node("c");
        let dm = floyd_warshall(&g);
        assert_eq!(dm.distance("a", "b"), 1.0);
        assert!(dm.distance("b", "a").is_infinite());
        assert!(dm.distance("a", "c").is_infinite());
        assert!(dm.distance("a", "nowhere").is_infinite());
    }

    #[test]
    fn test_negative_cycle_shows_on_diagonal() {
        let mut g = LocationGraph::new();
        g.add_edge("a", "b", -3.0).unwrap();
        g.add_edge("b", "a", 1.0).unwrap();
        let dm = floyd_warshall(&g);
        assert!(dm.has_negative_cycle());
    }

    #[test]
    fn test_empty_graph() {
        let dm = floyd_warshall(&LocationGraph::new());
        assert_eq!(dm.size(), 0);
        assert!(!dm.has_negative_cycle());
    }
}
