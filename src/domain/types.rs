use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDateTime};

use crate::domain::graph::LocationGraph;

/// Depot or customer name. Identity is the name itself.
pub type Location = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    CafeLatte,
    Capuccino,
    Croissant,
    Muffin,
    Americano,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::CafeLatte,
        Product::Capuccino,
        Product::Croissant,
        Product::Muffin,
        Product::Americano,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Product::CafeLatte => "Café Latte",
            Product::Capuccino => "Capuccino",
            Product::Croissant => "Croissant",
            Product::Muffin => "Muffin",
            Product::Americano => "Americano",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u32,
    pub customer: Location,
    pub product: Product,
    pub timestamp: NaiveDateTime,
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The `days` days leading up to (and excluding) `reference`.
    pub fn last_days(reference: NaiveDateTime, days: i64) -> Self {
        Self {
            start: reference - Duration::days(days),
            end: reference,
        }
    }

    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Reduced network for one time window: all depots plus the customers with orders.
#[derive(Debug, Clone)]
pub struct ActiveNetwork {
    pub graph: LocationGraph,
    pub depots: Vec<Location>,
    pub active_customers: Vec<Location>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepotAssignment {
    pub depot: Location,
    pub distance: f64,
}

/// Customer -> nearest depot. Unreachable customers are absent.
pub type Assignment = BTreeMap<Location, DepotAssignment>;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPath {
    pub customer: Location,
    pub distance: f64,
    pub path: Option<Vec<Location>>,
    // false when the distance may be skewed by a negative cycle
    pub trusted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepotPaths {
    pub depot: Location,
    pub negative_cycle: bool,
    pub customers: Vec<CustomerPath>,
}

impl DepotPaths {
    pub fn to_customer(&self, customer: &str) -> Option<&CustomerPath> {
        self.customers.iter().find(|c| c.customer == customer)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BellmanFordReport {
    pub depots: Vec<DepotPaths>,
    pub negative_cycle_depots: Vec<Location>,
}

impl BellmanFordReport {
    pub fn for_depot(&self, depot: &str) -> Option<&DepotPaths> {
        self.depots.iter().find(|d| d.depot == depot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Heuristic,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Depot first, then customers in visiting order.
    pub stops: Vec<Location>,
    /// Walk through the sub-structure, including pass-through nodes.
    pub path: Vec<Location>,
    pub length: f64,
    pub method: RouteMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepotRoute {
    pub depot: Location,
    pub customers: Vec<Location>,
    /// `None` when the depot has no pending work.
    pub route: Option<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    OpenNewDepot,
    ReorganizeRoutes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub rationale: String,
    pub proposal: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairDistance {
    pub from: Location,
    pub to: Location,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalousPair {
    pub from: Location,
    pub to: Location,
    pub distance: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub busiest_customer: Option<(Location, usize)>,
    pub farthest_customer: Option<(Location, f64)>,
    pub min_depot_distances: Vec<(Location, f64)>,
    pub anomalous_pairs: Vec<AnomalousPair>,
    pub suggestions: Vec<Suggestion>,
}
