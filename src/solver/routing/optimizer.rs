use tracing::{debug, info, warn};

use crate::distance::matrix::{floyd_warshall, DistanceMatrix};
use crate::domain::graph::LocationGraph;
use crate::domain::types::{ActiveNetwork, Assignment, DepotRoute, Location, Route, RouteMethod};
use crate::evaluation::fitness::find_distance;
use crate::solver::assignment::{customers_for_depot, single_source_paths};

use super::tour::{approximate_tour, TourOptions};

/// One route per depot over the customers assigned to it.
pub fn optimize_routes(
    network: &ActiveNetwork,
    assignment: &Assignment,
    options: &TourOptions,
) -> Vec<DepotRoute> {
    network
        .depots
        .iter()
        .map(|depot| {
            let customers = customers_for_depot(assignment, depot);
            let route = optimize_depot_route(&network.graph, depot, &customers, options);
            if route.is_none() {
                info!("{} has no pending deliveries", depot);
            }
            DepotRoute {
                depot: depot.clone(),
                customers,
                route,
            }
        })
        .collect()
}

/// Approximate visiting order over `{depot} ∪ customers`, restricted to the
/// edges between those nodes. Returns `None` when there is nothing to deliver.
///
/// Falls back to sorting customers by their shortest distance from the depot
/// when the heuristic cannot run on the sub-structure.
pub fn optimize_depot_route(
    graph: &LocationGraph,
    depot: &str,
    customers: &[Location],
    options: &TourOptions,
) -> Option<Route> {
    if customers.is_empty() {
        return None;
    }

    let mut nodes = vec![depot.to_string()];
    nodes.extend(customers.iter().cloned());
    let sub = graph.induced_subgraph(&nodes);
    let closure = floyd_warshall(&sub);

    let route = match approximate_tour(&closure, 0, options) {
        Ok(mut order) => {
            let length = find_distance(&order, &closure, options.return_to_depot);
            let path = expand_walk(&sub, &order, options.return_to_depot);
            if options.return_to_depot {
                order.push(0);
            }
            Route {
                stops: order.into_iter().map(|i| sub.name(i).to_string()).collect(),
                path,
                length,
                method: RouteMethod::Heuristic,
            }
        }
        Err(err) => {
            warn!("Tour heuristic unavailable for {}: {}", depot, err);
            fallback_route(&sub, &closure, options.return_to_depot)
        }
    };

    debug!("{} route: {:?}", depot, route.stops);
    Some(route)
}

/// `[depot]` followed by the customers sorted by distance from the depot.
/// Unreachable customers go last in their original order.
fn fallback_route(sub: &LocationGraph, closure: &DistanceMatrix, closed: bool) -> Route {
    let paths = single_source_paths(sub, 0);
    let mut order: Vec<usize> = (1..sub.node_count()).collect();
    order.sort_by(|&a, &b| paths.tree.distance(a).total_cmp(&paths.tree.distance(b)));
    order.insert(0, 0);

    let length = find_distance(&order, closure, closed);
    if closed {
        order.push(0);
    }
    let stops: Vec<Location> = order.iter().map(|&i| sub.name(i).to_string()).collect();

    Route {
        path: stops.clone(),
        stops,
        length,
        method: RouteMethod::Fallback,
    }
}

/// Replaces each leg of `order` by the shortest path through `sub`.
fn expand_walk(sub: &LocationGraph, order: &[usize], closed: bool) -> Vec<Location> {
    let mut legs: Vec<usize> = order.to_vec();
    if closed && order.len() > 1 {
        legs.push(order[0]);
    }

    let mut walk = vec![legs[0]];
    for pair in legs.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match single_source_paths(sub, from).tree.path(to) {
            Some(path) => walk.extend(path.into_iter().skip(1)),
            None => walk.push(to),
        }
    }

    walk.into_iter().map(|i| sub.name(i).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DepotAssignment;
    use crate::solver::routing::tour::TourError;

    fn names(v: &[&str]) -> Vec<Location> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn star() -> LocationGraph {
        LocationGraph::from_symmetric_routes(&[
            ("Centro", "B", 3.0),
            ("Centro", "C", 4.0),
            ("B", "C", 3.0),
            ("C", "D", 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn no_customers_means_no_route() {
        assert_eq!(optimize_depot_route(&star(), "Centro", &[], &TourOptions::default()), None);
    }

    #[test]
    fn heuristic_route_starts_at_depot() {
        let options = TourOptions {
            two_opt: true,
            return_to_depot: false,
        };
        let route = optimize_depot_route(&star(), "Centro", &names(&["C", "B"]), &options).unwrap();
        assert_eq!(route.method, RouteMethod::Heuristic);
        assert_eq!(route.stops, names(&["Centro", "B", "C"]));
        assert_eq!(route.length, 6.0);
        assert_eq!(route.path, names(&["Centro", "B", "C"]));
    }

    #[test]
    fn closed_route_returns_to_depot() {
        let options = TourOptions {
            two_opt: true,
            return_to_depot: true,
        };
        let route = optimize_depot_route(&star(), "Centro", &names(&["B", "C"]), &options).unwrap();
        assert_eq!(route.stops.first(), route.stops.last());
        assert_eq!(route.length, 10.0);
    }

    #[test]
    fn walk_passes_through_intermediate_stops() {
        // B is only reachable through A inside the sub-structure
        let g = LocationGraph::from_symmetric_routes(&[("Norte", "A", 4.0), ("A", "B", 2.0)]).unwrap();
        let options = TourOptions {
            two_opt: false,
            return_to_depot: true,
        };
        let route = optimize_depot_route(&g, "Norte", &names(&["B", "A"]), &options).unwrap();
        assert_eq!(route.stops, names(&["Norte", "A", "B", "Norte"]));
        assert_eq!(route.path, names(&["Norte", "A", "B", "A", "Norte"]));
    }

    #[test]
    fn disconnected_sub_structure_uses_fallback() {
        // D only connects to Centro through C, which is not part of this route
        let route = optimize_depot_route(
            &star(),
            "Centro",
            &names(&["D", "B"]),
            &TourOptions::default(),
        )
        .unwrap();
        assert_eq!(route.method, RouteMethod::Fallback);
        assert_eq!(route.stops, names(&["Centro", "B", "D"]));
        assert!(route.length.is_infinite());
    }

    #[test]
    fn negative_cycle_in_sub_structure_uses_fallback() {
        let g = LocationGraph::from_symmetric_routes(&[("Norte", "A", 2.0), ("A", "B", -1.0)])
            .unwrap();
        let customers = names(&["A", "B"]);
        let closure = floyd_warshall(&g.induced_subgraph(&names(&["Norte", "A", "B"])));
        assert!(matches!(
            approximate_tour(&closure, 0, &TourOptions::default()),
            Err(TourError::NegativeCycle { .. })
        ));

        let route = optimize_depot_route(&g, "Norte", &customers, &TourOptions::default()).unwrap();
        assert_eq!(route.method, RouteMethod::Fallback);
        assert_eq!(route.stops, names(&["Norte", "B", "A"]));
        assert_eq!(route.path, route.stops);
    }

    #[test]
    fn optimize_routes_covers_every_depot() {
        let network = ActiveNetwork {
            graph: star(),
            depots: names(&["Centro", "Sur"]),
            active_customers: names(&["B", "C"]),
            orders: vec![],
        };
        let mut assignment = Assignment::new();
        for (customer, distance) in [("B", 3.0), ("C", 4.0)] {
            assignment.insert(
                customer.to_string(),
                DepotAssignment {
                    depot: "Centro".to_string(),
                    distance,
                },
            );
        }
        let routes = optimize_routes(&network, &assignment, &TourOptions::default());
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].customers, names(&["B", "C"]));
        assert!(routes[0].route.is_some());
        assert_eq!(routes[1].depot, "Sur");
        assert!(routes[1].route.is_none());
    }
}
