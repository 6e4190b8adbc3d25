use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, info};

use crate::config::constant::{
    BUSY_CUSTOMER_ORDER_THRESHOLD, FAR_CUSTOMER_THRESHOLD_KM, Z_SCORE_THRESHOLD,
};
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::{
    Analysis, AnomalousPair, Location, Order, PairDistance, Suggestion, SuggestionKind,
};

/// Orders per customer, in order of first appearance.
pub fn order_counts(orders: &[Order]) -> Vec<(Location, usize)> {
    let mut counts: Vec<(Location, usize)> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();
    for order in orders {
        match index.get(order.customer.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(order.customer.as_str(), counts.len());
                counts.push((order.customer.clone(), 1));
            }
        }
    }
    counts
}

/// Customer with the most orders; the earliest to appear wins ties.
pub fn busiest_customer(orders: &[Order]) -> Option<(Location, usize)> {
    let mut best: Option<(Location, usize)> = None;
    for (customer, count) in order_counts(orders) {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((customer, count));
        }
    }
    best
}

/// For each customer, the smallest matrix distance from any depot.
pub fn min_depot_distances(
    dm: &DistanceMatrix,
    depots: &[Location],
    customers: &[Location],
) -> Vec<(Location, f64)> {
    customers
        .iter()
        .map(|customer| {
            let d = depots
                .iter()
                .map(|depot| dm.distance(depot, customer))
                .fold(f64::INFINITY, f64::min);
            (customer.clone(), d)
        })
        .collect()
}

/// Largest minimum depot distance; the first customer wins ties.
pub fn farthest_customer(min_distances: &[(Location, f64)]) -> Option<(Location, f64)> {
    let mut best: Option<&(Location, f64)> = None;
    for entry in min_distances {
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.cloned()
}

/// Finite distances for every unordered pair `(u, v)` with `u` before `v` in
/// matrix order, read in the `u -> v` direction.
pub fn pairwise_distances(dm: &DistanceMatrix) -> Vec<PairDistance> {
    (0..dm.size())
        .tuple_combinations::<(usize, usize)>()
        .filter_map(|(i, j)| {
            let distance = dm.get(i, j);
            distance.is_finite().then(|| PairDistance {
                from: dm.nodes()[i].clone(),
                to: dm.nodes()[j].clone(),
                distance,
            })
        })
        .collect()
}

/// Pairs whose |z-score| exceeds `threshold`, using the population mean and
/// standard deviation. Fewer than two samples, or zero spread, flags nothing.
pub fn find_anomalous_pairs(pairs: &[PairDistance], threshold: f64) -> Vec<AnomalousPair> {
    if pairs.len() < 2 {
        return vec![];
    }

    let n = pairs.len() as f64;
    let mean = pairs.iter().map(|p| p.distance).sum::<f64>() / n;
    let variance = pairs.iter().map(|p| (p.distance - mean).powi(2)).sum::<f64>() / n;
    let stdev = variance.sqrt();
    debug!("Pair distances: mean {:.3}, stdev {:.3}", mean, stdev);

    pairs
        .iter()
        .filter_map(|p| {
            let z_score = if stdev == 0.0 {
                0.0
            } else {
                (p.distance - mean) / stdev
            };
            (z_score.abs() > threshold).then(|| AnomalousPair {
                from: p.from.clone(),
                to: p.to.clone(),
                distance: p.distance,
                z_score,
            })
        })
        .collect()
}

/// Descriptive suggestions; nothing here changes the network.
pub fn suggest_actions(
    farthest: Option<&(Location, f64)>,
    counts: &[(Location, usize)],
    active_customers: &[Location],
) -> Vec<Suggestion> {
    let mut suggestions = vec![];

    if let Some((customer, distance)) = farthest {
        if distance.is_finite() && *distance > FAR_CUSTOMER_THRESHOLD_KM {
            suggestions.push(Suggestion {
                kind: SuggestionKind::OpenNewDepot,
                rationale: format!("{} is {:.2} km from the closest depot.", customer, distance),
                proposal: format!(
                    "Consider opening a delivery point near {} or reorganizing routes.",
                    customer
                ),
            });
        }
    }

    let busy: Vec<String> = active_customers
        .iter()
        .filter_map(|customer| {
            let count = counts
                .iter()
                .find(|(c, _)| c == customer)
                .map_or(0, |(_, n)| *n);
            (count >= BUSY_CUSTOMER_ORDER_THRESHOLD).then(|| format!("{} ({})", customer, count))
        })
        .collect();

    if !busy.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionKind::ReorganizeRoutes,
            rationale: format!("Customers with several orders: {}", busy.join(", ")),
            proposal: "Evaluate joint routes or a pick-up point to batch deliveries.".to_string(),
        });
    }

    suggestions
}

pub fn analyse(
    dm: &DistanceMatrix,
    orders: &[Order],
    depots: &[Location],
    active_customers: &[Location],
) -> Analysis {
    let counts = order_counts(orders);
    let min_distances = min_depot_distances(dm, depots, active_customers);
    let farthest = farthest_customer(&min_distances);
    let anomalous_pairs = find_anomalous_pairs(&pairwise_distances(dm), Z_SCORE_THRESHOLD);
    let suggestions = suggest_actions(farthest.as_ref(), &counts, active_customers);

    info!(
        "Analysis: {} anomalous pairs, {} suggestions",
        anomalous_pairs.len(),
        suggestions.len()
    );

    Analysis {
        busiest_customer: busiest_customer(orders),
        farthest_customer: farthest,
        min_depot_distances: min_distances,
        anomalous_pairs,
        suggestions,
    }
}
