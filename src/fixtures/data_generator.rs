use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use tracing::{debug, info};

use crate::config::constant::{BASE_ROUTES, WINDOW_DAYS};
use crate::domain::graph::{GraphError, LocationGraph};
use crate::domain::types::{Order, Product, TimeWindow};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Builds the symmetric base network from the configured road list.
pub fn load_base_network() -> Result<LocationGraph, GraphError> {
    LocationGraph::from_symmetric_routes(&BASE_ROUTES)
}

/// Generates a random number of orders (within `count_range`) spread over the
/// `WINDOW_DAYS` days before `reference`.
///
/// Ids run from 1 in generation order. Customer and product are drawn uniformly.
pub fn simulate_orders<R: Rng>(
    rng: &mut R,
    count_range: RangeInclusive<usize>,
    reference: NaiveDateTime,
    customers: &[&str],
) -> Vec<Order> {
    if count_range.is_empty() || customers.is_empty() {
        return vec![];
    }

    let n = rng.gen_range(count_range);
    let span_millis = WINDOW_DAYS as f64 * MILLIS_PER_DAY;
    let mut orders = Vec::with_capacity(n);

    for i in 0..n {
        let offset = Duration::milliseconds((rng.gen::<f64>() * span_millis) as i64);
        let customer = customers[rng.gen_range(0..customers.len())];
        let product = Product::ALL[rng.gen_range(0..Product::ALL.len())];
        orders.push(Order {
            id: (i + 1) as u32,
            customer: customer.to_string(),
            product,
            timestamp: reference - offset,
        });
    }

    info!("Simulated {} orders", orders.len());
    debug!("Orders: {:?}", orders);
    orders
}

/// Keeps the orders inside `window`, preserving their relative order.
pub fn filter_orders(orders: &[Order], window: &TimeWindow) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| window.contains(&o.timestamp))
        .cloned()
        .collect()
}
