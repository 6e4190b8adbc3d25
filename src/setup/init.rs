use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::domain::graph::LocationGraph;
use crate::domain::types::{ActiveNetwork, Location, Order, TimeWindow};
use crate::fixtures::data_generator::filter_orders;

/// Distinct customers with at least one order, sorted by name.
pub fn active_customers(orders: &[Order]) -> Vec<Location> {
    orders
        .iter()
        .map(|o| o.customer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reduced graph over every depot plus the active customers. Depots stay even
/// when nothing is reachable from them.
pub fn extract_active_graph(
    base: &LocationGraph,
    depots: &[&str],
    active_customers: &[Location],
) -> LocationGraph {
    let mut keep: Vec<Location> = depots.iter().map(|d| d.to_string()).collect();
    keep.extend(active_customers.iter().cloned());
    let graph = base.induced_subgraph(&keep);
    debug!(
        "Active graph: {} nodes, {} directed edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Filters orders to `window` and builds the matching active network.
pub fn setup(
    base: &LocationGraph,
    depots: &[&str],
    orders: &[Order],
    window: &TimeWindow,
) -> ActiveNetwork {
    info!(
        "Starting setup with {} depots and {} orders",
        depots.len(),
        orders.len()
    );

    let window_orders = filter_orders(orders, window);
    let customers = active_customers(&window_orders);
    let graph = extract_active_graph(base, depots, &customers);

    info!(
        "{} orders in window, {} active customers",
        window_orders.len(),
        customers.len()
    );

    ActiveNetwork {
        graph,
        depots: depots.iter().map(|d| d.to_string()).collect(),
        active_customers: customers,
        orders: window_orders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    use crate::domain::types::Product;

    fn order(id: u32, customer: &str, days_ago: i64) -> Order {
        let reference = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Order {
            id,
            customer: customer.to_string(),
            product: Product::Americano,
            timestamp: reference - Duration::days(days_ago),
        }
    }

    fn base() -> LocationGraph {
        LocationGraph::from_symmetric_routes(&[
            ("Norte", "A", 4.0),
            ("Norte", "B", 6.0),
            ("Centro", "B", 3.0),
            ("A", "B", 2.0),
            ("B", "C", 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn active_customers_are_distinct_and_sorted() {
        let orders = vec![order(1, "C", 1), order(2, "A", 1), order(3, "C", 2)];
        assert_eq!(active_customers(&orders), vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn active_graph_drops_inactive_customers() {
        let g = extract_active_graph(&base(), &["Norte", "Centro", "Sur"], &["B".to_string()]);
        assert_eq!(g.nodes(), &["Norte", "Centro", "Sur", "B"]);
        assert_eq!(g.weight("Norte", "B"), Some(6.0));
        assert_eq!(g.weight("Centro", "B"), Some(3.0));
        assert!(!g.contains("A"));
        // Sur has no edges but is still a node
        assert!(g.neighbours(g.index_of("Sur").unwrap()).is_empty());
    }

    #[test]
    fn setup_uses_only_orders_in_window() {
        let orders = vec![order(1, "A", 10), order(2, "B", 1)];
        let reference = orders[1].timestamp + Duration::days(1);
        let window = TimeWindow::last_days(reference, 7);
        let network = setup(&base(), &["Norte", "Centro"], &orders, &window);
        assert_eq!(network.orders.len(), 1);
        assert_eq!(network.active_customers, vec!["B".to_string()]);
        assert_eq!(network.graph.node_count(), 3);
    }
}
