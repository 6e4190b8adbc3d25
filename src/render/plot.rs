use std::error::Error;
use std::f64::consts::TAU;
use std::path::PathBuf;

use plotters::prelude::*;
use tracing::info;

use crate::config::constant::{CANVAS_SIZE, ROUTE_PALETTE};
use crate::domain::graph::LocationGraph;
use crate::domain::types::{DepotRoute, Location};

const DEPOT_FILL: RGBColor = RGBColor(255, 165, 0);
const CUSTOMER_FILL: RGBColor = RGBColor(144, 238, 144);
const EDGE_COLOR: RGBColor = RGBColor(170, 170, 170);
const NODE_RADIUS: i32 = 14;

/// Draws the network with each depot's route highlighted.
pub trait RouteRenderer {
    fn render(
        &self,
        full: &LocationGraph,
        routes: &[DepotRoute],
        active: &LocationGraph,
    ) -> Result<(), Box<dyn Error>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub name: Location,
    pub position: (f64, f64),
    pub fill: RGBColor,
    pub outlined: bool,
}

/// Nodes evenly spaced on the unit circle, in graph order.
pub fn circular_layout(graph: &LocationGraph) -> Vec<(f64, f64)> {
    let n = graph.node_count().max(1) as f64;
    (0..graph.node_count())
        .map(|i| {
            let angle = TAU * i as f64 / n;
            (angle.cos(), angle.sin())
        })
        .collect()
}

/// Writes the chart as a PNG bitmap.
pub struct PlotRenderer {
    pub path: PathBuf,
    pub depots: Vec<Location>,
    pub size: (u32, u32),
}

impl PlotRenderer {
    pub fn new(path: impl Into<PathBuf>, depots: &[Location]) -> Self {
        Self {
            path: path.into(),
            depots: depots.to_vec(),
            size: CANVAS_SIZE,
        }
    }

    /// Depots orange, customers light green, active locations outlined.
    pub fn node_styles(&self, full: &LocationGraph, active: &LocationGraph) -> Vec<NodeStyle> {
        full.nodes()
            .iter()
            .zip(circular_layout(full))
            .map(|(name, position)| NodeStyle {
                name: name.clone(),
                position,
                fill: if self.depots.contains(name) {
                    DEPOT_FILL
                } else {
                    CUSTOMER_FILL
                },
                outlined: active.contains(name),
            })
            .collect()
    }

    /// Highlighted walks with their colour. The palette index follows the
    /// depot position, so depots without a route still consume a colour.
    pub fn highlighted_routes<'a>(
        &self,
        routes: &'a [DepotRoute],
    ) -> Vec<(RGBColor, &'a [Location])> {
        routes
            .iter()
            .enumerate()
            .filter_map(|(i, depot_route)| {
                let route = depot_route.route.as_ref()?;
                let (r, g, b) = ROUTE_PALETTE[i % ROUTE_PALETTE.len()];
                Some((RGBColor(r, g, b), route.path.as_slice()))
            })
            .collect()
    }
}

impl RouteRenderer for PlotRenderer {
    fn render(
        &self,
        full: &LocationGraph,
        routes: &[DepotRoute],
        active: &LocationGraph,
    ) -> Result<(), Box<dyn Error>> {
        let nodes = self.node_styles(full, active);
        let position = |name: &str| full.index_of(name).map(|i| nodes[i].position);

        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                "SmartCoffee: network and optimized routes per depot",
                ("sans-serif", 24).into_font(),
            )
            .margin(20)
            .build_cartesian_2d(-1.3f64..1.3f64, -1.3f64..1.3f64)?;

        for (from, to, weight) in full.edges() {
            // symmetric pairs are drawn once
            if from > to && full.weight(to, from) == Some(weight) {
                continue;
            }
            let (Some(a), Some(b)) = (position(from), position(to)) else {
                continue;
            };
            chart.draw_series(LineSeries::new(vec![a, b], EDGE_COLOR.stroke_width(1)))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{}", weight),
                ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
                ("sans-serif", 14).into_font(),
            )))?;
        }

        for (color, path) in self.highlighted_routes(routes) {
            let points: Vec<(f64, f64)> = path.iter().filter_map(|name| position(name)).collect();
            chart.draw_series(LineSeries::new(points, color.stroke_width(4)))?;
        }

        for node in &nodes {
            chart.draw_series(std::iter::once(Circle::new(
                node.position,
                NODE_RADIUS,
                node.fill.filled(),
            )))?;
            if node.outlined {
                chart.draw_series(std::iter::once(Circle::new(
                    node.position,
                    NODE_RADIUS,
                    BLACK.stroke_width(2),
                )))?;
            }
            chart.draw_series(std::iter::once(Text::new(
                node.name.clone(),
                (node.position.0, node.position.1 + 0.12),
                ("sans-serif", 16).into_font(),
            )))?;
        }

        root.present()?;
        info!("Wrote route chart to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Route, RouteMethod};

    fn names(v: &[&str]) -> Vec<Location> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn layout_is_deterministic_on_the_unit_circle() {
        let g = LocationGraph::from_symmetric_routes(&[("Norte", "A", 4.0), ("A", "B", 2.0)]).unwrap();
        let layout = circular_layout(&g);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout, circular_layout(&g));
        assert_eq!(layout[0], (1.0, 0.0));
        for (x, y) in layout {
            assert!((x * x + y * y - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn nodes_are_coloured_by_role_and_activity() {
        let full = LocationGraph::from_symmetric_routes(&[("Norte", "A", 4.0), ("A", "B", 2.0)]).unwrap();
        let active = full.induced_subgraph(&names(&["Norte", "A"]));
        let renderer = PlotRenderer::new("unused.png", &names(&["Norte"]));
        let styles = renderer.node_styles(&full, &active);

        assert_eq!(styles[0].name, "Norte");
        assert_eq!(styles[0].fill, DEPOT_FILL);
        assert!(styles[0].outlined);
        assert_eq!(styles[2].name, "B");
        assert_eq!(styles[2].fill, CUSTOMER_FILL);
        assert!(!styles[2].outlined);
    }

    #[test]
    fn route_colours_follow_depot_position() {
        let routes = vec![
            DepotRoute {
                depot: "Sur".to_string(),
                customers: vec![],
                route: None,
            },
            DepotRoute {
                depot: "Norte".to_string(),
                customers: names(&["A"]),
                route: Some(Route {
                    stops: names(&["Norte", "A"]),
                    path: names(&["Norte", "A"]),
                    length: 4.0,
                    method: RouteMethod::Heuristic,
                }),
            },
        ];
        let renderer = PlotRenderer::new("unused.png", &names(&["Sur", "Norte"]));
        let highlighted = renderer.highlighted_routes(&routes);

        assert_eq!(highlighted.len(), 1);
        let (r, g, b) = ROUTE_PALETTE[1];
        assert_eq!(highlighted[0].0, RGBColor(r, g, b));
        assert_eq!(highlighted[0].1, names(&["Norte", "A"]).as_slice());
    }
}
