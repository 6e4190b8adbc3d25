use crate::distance::matrix::DistanceMatrix;

/// Length of the walk `order[0] -> order[1] -> ... -> order[n-1]`, plus the
/// leg back to `order[0]` when `closed`.
pub fn find_distance(order: &[usize], dm: &DistanceMatrix, closed: bool) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }

    let mut total_dist: f64 = order.windows(2).map(|w| dist_between(w[0], w[1], dm)).sum();
    if closed {
        total_dist += dist_between(order[order.len() - 1], order[0], dm);
    }
    total_dist
}

pub fn dist_between(from_loc: usize, to_loc: usize, dm: &DistanceMatrix) -> f64 {
    dm.get(from_loc, to_loc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::matrix::floyd_warshall;
    use crate::domain::graph::LocationGraph;

    #[test]
    fn open_and_closed_lengths() {
        let g = LocationGraph::from_symmetric_routes(&[("d", "a", 1.0), ("a", "b", 2.0)]).unwrap();
        let dm = floyd_warshall(&g);
        assert_eq!(find_distance(&[0, 1, 2], &dm, false), 3.0);
        assert_eq!(find_distance(&[0, 1, 2], &dm, true), 6.0);
        assert_eq!(find_distance(&[0], &dm, true), 0.0);
    }
}
