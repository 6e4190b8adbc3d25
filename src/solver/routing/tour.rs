//! Nearest-neighbour tour construction with optional 2-opt improvement.
//!
//! # Algorithm
//!
//! Starting at the depot, repeatedly move to the closest unvisited stop.
//! 2-opt then reverses segments `[i..=j]` (the depot at position 0 never
//! moves) while that strictly shortens the tour. Lengths are re-evaluated in
//! full for every candidate, so asymmetric distances are handled correctly.
//!
//! Distances are read from a metric closure: every pair must be reachable and
//! no negative cycle may be present, otherwise the heuristic refuses to run.

use thiserror::Error;

use crate::config::constant::{RETURN_TO_DEPOT, TWO_OPT};
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Location;
use crate::evaluation::fitness::find_distance;

const IMPROVEMENT_EPS: f64 = 1e-10;

#[derive(Debug, Error, PartialEq)]
pub enum TourError {
    #[error("no stops to visit")]
    Empty,
    #[error("{to} is unreachable from {from}")]
    Disconnected { from: Location, to: Location },
    #[error("negative cycle through {location}")]
    NegativeCycle { location: Location },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourOptions {
    pub two_opt: bool,
    pub return_to_depot: bool,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            two_opt: TWO_OPT,
            return_to_depot: RETURN_TO_DEPOT,
        }
    }
}

/// Checks that `dm` is a usable metric closure.
pub fn check_closure(dm: &DistanceMatrix) -> Result<(), TourError> {
    if dm.size() == 0 {
        return Err(TourError::Empty);
    }
    for i in 0..dm.size() {
        if dm.get(i, i) < 0.0 {
            return Err(TourError::NegativeCycle {
                location: dm.nodes()[i].clone(),
            });
        }
        for j in 0..dm.size() {
            if !dm.get(i, j).is_finite() {
                return Err(TourError::Disconnected {
                    from: dm.nodes()[i].clone(),
                    to: dm.nodes()[j].clone(),
                });
            }
        }
    }
    Ok(())
}

/// Visiting order over every index of `dm`, starting at `start`.
pub fn approximate_tour(
    dm: &DistanceMatrix,
    start: usize,
    options: &TourOptions,
) -> Result<Vec<usize>, TourError> {
    check_closure(dm)?;
    let order = nearest_neighbor_order(dm, start);
    if options.two_opt {
        Ok(two_opt_improve(&order, dm, options.return_to_depot))
    } else {
        Ok(order)
    }
}

/// Greedy order; ties go to the lower index.
pub fn nearest_neighbor_order(dm: &DistanceMatrix, start: usize) -> Vec<usize> {
    let n = dm.size();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = start;
    visited[start] = true;
    order.push(start);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (i, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let d = dm.get(current, i);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        match best {
            Some((next, _)) => {
                visited[next] = true;
                order.push(next);
                current = next;
            }
            None => break,
        }
    }

    order
}

/// First-improvement 2-opt keeping `order[0]` fixed.
pub fn two_opt_improve(order: &[usize], dm: &DistanceMatrix, closed: bool) -> Vec<usize> {
    let mut current = order.to_vec();
    let n = current.len();
    if n < 3 {
        return current;
    }

    let mut best_len = find_distance(&current, dm, closed);
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                current[i..=j].reverse();
                let len = find_distance(&current, dm, closed);
                if len < best_len - IMPROVEMENT_EPS {
                    best_len = len;
                    improved = true;
                } else {
                    current[i..=j].reverse();
                }
            }
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::matrix::floyd_warshall;
    use crate::domain::graph::LocationGraph;

    fn line() -> DistanceMatrix {
        // d - a - b - c on a line, 1 km apart
        let g = LocationGraph::from_symmetric_routes(&[
            ("d", "a", 1.0),
            ("a", "b", 1.0),
            ("b", "c", 1.0),
        ])
        .unwrap();
        floyd_warshall(&g)
    }

    #[test]
    fn test_nn_follows_the_line() {
        let dm = line();
        assert_eq!(nearest_neighbor_order(&dm, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_two_opt_fixes_bad_order() {
        let dm = line();
        let improved = two_opt_improve(&[0, 3, 1, 2], &dm, false);
        assert_eq!(improved[0], 0);
        assert_eq!(find_distance(&improved, &dm, false), 3.0);
    }

    #[test]
    fn test_two_opt_does_not_worsen() {
        let dm = line();
        let start = vec![0, 2, 3, 1];
        let before = find_distance(&start, &dm, true);
        let after = two_opt_improve(&start, &dm, true);
        assert!(find_distance(&after, &dm, true) <= before);
        let mut sorted = after.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_disconnected_closure_is_rejected() {
        let mut g = LocationGraph::new();
        g.add_edge("d", "a", 1.0).unwrap();
        g.add_node("b");
        let dm = floyd_warshall(&g);
        assert!(matches!(
            approximate_tour(&dm, 0, &TourOptions::default()),
            Err(TourError::Disconnected { .. })
        ));
    }

    #[test]
    fn test_one_way_edge_is_disconnected() {
        let mut g = LocationGraph::new();
        g.add_edge("d", "a", 1.0).unwrap();
        let dm = floyd_warshall(&g);
        assert_eq!(
            check_closure(&dm),
            Err(TourError::Disconnected {
                from: "a".to_string(),
                to: "d".to_string()
            })
        );
    }

    #[test]
    fn test_negative_cycle_is_rejected() {
        let mut g = LocationGraph::new();
        g.add_edge("d", "a", -2.0).unwrap();
        g.add_edge("a", "d", 1.0).unwrap();
        let dm = floyd_warshall(&g);
        assert!(matches!(check_closure(&dm), Err(TourError::NegativeCycle { .. })));
    }

    #[test]
    fn test_single_stop_tour() {
        let g = {
            let mut g = LocationGraph::new();
            g.add_node("d");
            g
        };
        let dm = floyd_warshall(&g);
        assert_eq!(approximate_tour(&dm, 0, &TourOptions::default()), Ok(vec![0]));
    }
}
