use tracing::{debug, info, warn};

use crate::distance::shortest_path::{bellman_ford, dijkstra, ShortestPathError, ShortestPathTree};
use crate::domain::graph::LocationGraph;
use crate::domain::types::{
    ActiveNetwork, Assignment, BellmanFordReport, CustomerPath, DepotAssignment, DepotPaths,
};

/// Shortest paths from one source. On a negative cycle, nodes the cycle
/// reaches take their entries from Dijkstra and are marked in `affected`;
/// every other node keeps its exact Bellman-Ford entry.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub tree: ShortestPathTree,
    pub negative_cycle: bool,
    pub affected: Vec<bool>,
}

pub fn single_source_paths(graph: &LocationGraph, source: usize) -> SourcePaths {
    match bellman_ford(graph, source) {
        Ok(tree) => SourcePaths {
            affected: vec![false; graph.node_count()],
            tree,
            negative_cycle: false,
        },
        Err(ShortestPathError::NegativeCycle {
            origin,
            mut tree,
            affected,
        }) => {
            debug!("Bellman-Ford aborted at {}, using Dijkstra for affected nodes", origin);
            let fallback = dijkstra(graph, source);
            for v in (0..graph.node_count()).filter(|&v| affected[v]) {
                tree.distances[v] = fallback.distances[v];
                tree.predecessors[v] = fallback.predecessors[v];
            }
            SourcePaths {
                tree,
                negative_cycle: true,
                affected,
            }
        }
    }
}

/// Bellman-Ford from every depot present in the active graph towards every
/// active customer. Depots whose reachable part holds a negative cycle are
/// collected in `negative_cycle_depots` (sorted).
pub fn bellman_ford_per_depot(network: &ActiveNetwork) -> BellmanFordReport {
    let graph = &network.graph;
    let mut report = BellmanFordReport::default();

    for depot in &network.depots {
        let Some(source) = graph.index_of(depot) else {
            continue;
        };
        let paths = single_source_paths(graph, source);
        if paths.negative_cycle {
            warn!("Negative cycle reachable from {}", depot);
            report.negative_cycle_depots.push(depot.clone());
        }

        let customers = network
            .active_customers
            .iter()
            .map(|customer| match graph.index_of(customer) {
                Some(target) => CustomerPath {
                    customer: customer.clone(),
                    distance: paths.tree.distance(target),
                    path: paths
                        .tree
                        .path(target)
                        .map(|p| p.into_iter().map(|i| graph.name(i).to_string()).collect()),
                    trusted: !paths.affected[target],
                },
                None => CustomerPath {
                    customer: customer.clone(),
                    distance: f64::INFINITY,
                    path: None,
                    trusted: true,
                },
            })
            .collect();

        report.depots.push(DepotPaths {
            depot: depot.clone(),
            negative_cycle: paths.negative_cycle,
            customers,
        });
    }

    report.negative_cycle_depots.sort();
    report
}

/// Nearest depot per active customer.
///
/// Depots are tried in list order and only a strictly shorter distance
/// replaces the current best, so the first depot wins ties. Customers no
/// depot can reach are left out.
pub fn assign_customers(network: &ActiveNetwork, report: &BellmanFordReport) -> Assignment {
    let mut assignment = Assignment::new();

    for customer in &network.active_customers {
        let mut best: Option<DepotAssignment> = None;
        for depot_paths in &report.depots {
            let Some(entry) = depot_paths.to_customer(customer) else {
                continue;
            };
            let closer = best
                .as_ref()
                .map_or(entry.distance.is_finite(), |b| entry.distance < b.distance);
            if closer {
                best = Some(DepotAssignment {
                    depot: depot_paths.depot.clone(),
                    distance: entry.distance,
                });
            }
        }

        match best {
            Some(found) => {
                debug!("{} <- {} ({:.2} km)", customer, found.depot, found.distance);
                assignment.insert(customer.clone(), found);
            }
            None => warn!("{} is unreachable from every depot", customer),
        }
    }

    info!(
        "Assigned {} of {} active customers",
        assignment.len(),
        network.active_customers.len()
    );
    assignment
}

/// Customers assigned to `depot`, in customer-name order.
pub fn customers_for_depot(assignment: &Assignment, depot: &str) -> Vec<String> {
    assignment
        .iter()
        .filter(|(_, a)| a.depot == depot)
        .map(|(customer, _)| customer.clone())
        .collect()
}
