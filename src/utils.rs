use itertools::Itertools;

pub fn format_km(distance: f64) -> String {
    if distance.is_finite() {
        format!("{:.2} km", distance)
    } else {
        "unreachable".to_string()
    }
}

pub fn format_path(path: &[String]) -> String {
    path.iter().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_distances_and_paths() {
        assert_eq!(format_km(3.0), "3.00 km");
        assert_eq!(format_km(f64::INFINITY), "unreachable");
        let path = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(format_path(&path), "a -> b -> c");
    }
}
