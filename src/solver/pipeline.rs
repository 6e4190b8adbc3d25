use std::error::Error;

use chrono::Local;
use colored::*;
use dotenv::dotenv;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{
    CUSTOMERS, DEPOTS, ORDER_COUNT_MAX, ORDER_COUNT_MIN, RENDER_PNG_PATH, SEED, WINDOW_DAYS,
};
use crate::distance::matrix::{floyd_warshall, print_dist_matrix, DistanceMatrix};
use crate::domain::graph::LocationGraph;
use crate::domain::types::{
    ActiveNetwork, Analysis, Assignment, BellmanFordReport, DepotRoute, Order, RouteMethod,
    TimeWindow,
};
use crate::evaluation::analysis::analyse;
use crate::fixtures::data_generator::{load_base_network, simulate_orders};
use crate::render::plot::{PlotRenderer, RouteRenderer};
use crate::setup::init::setup;
use crate::solver::assignment::{assign_customers, bellman_ford_per_depot};
use crate::utils::{format_km, format_path};

use super::routing::optimizer::optimize_routes;
use super::routing::tour::TourOptions;

/// Everything one run produces for a fixed graph, order list and window.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub network: ActiveNetwork,
    pub paths: BellmanFordReport,
    pub assignment: Assignment,
    pub matrix: DistanceMatrix,
    pub analysis: Analysis,
    pub routes: Vec<DepotRoute>,
}

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()?;

    Ok(())
}

/// Window filter, active subgraph, shortest paths, analysis and routes.
pub fn run_pipeline(
    base: &LocationGraph,
    depots: &[&str],
    orders: &[Order],
    window: &TimeWindow,
    options: &TourOptions,
) -> PipelineOutcome {
    let network = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        setup(base, depots, orders, window)
    };

    let (paths, assignment, matrix) = {
        let span = span!(Level::INFO, "shortest_paths");
        let _guard = span.enter();
        let paths = bellman_ford_per_depot(&network);
        let assignment = assign_customers(&network, &paths);
        let matrix = floyd_warshall(&network.graph);
        print_dist_matrix(&matrix);
        if matrix.has_negative_cycle() {
            warn!("All-pairs distances include a negative cycle; matrix entries may disagree with per-depot paths");
        }
        (paths, assignment, matrix)
    };

    let analysis = {
        let span = span!(Level::INFO, "analysis");
        let _guard = span.enter();
        analyse(
            &matrix,
            &network.orders,
            &network.depots,
            &network.active_customers,
        )
    };

    let routes = {
        let span = span!(Level::INFO, "routing");
        let _guard = span.enter();
        optimize_routes(&network, &assignment, options)
    };

    PipelineOutcome {
        network,
        paths,
        assignment,
        matrix,
        analysis,
        routes,
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    println!(
        "\n{}\n",
        "=== SmartCoffee: delivery planning over simulated orders ===".bold()
    );

    let base = load_base_network()?;
    let reference = Local::now().naive_local();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let orders = simulate_orders(
        &mut rng,
        ORDER_COUNT_MIN..=ORDER_COUNT_MAX,
        reference,
        &CUSTOMERS,
    );
    print_orders(&orders);

    let window = TimeWindow::last_days(reference, WINDOW_DAYS);
    info!("Window: {} .. {}", window.start, window.end);

    let outcome = run_pipeline(&base, &DEPOTS, &orders, &window, &TourOptions::default());
    print_report(&outcome, &window);

    let renderer = PlotRenderer::new(RENDER_PNG_PATH, &outcome.network.depots);
    renderer.render(&base, &outcome.routes, &outcome.network.graph)?;

    Ok(())
}

fn print_orders(orders: &[Order]) {
    println!("Simulated orders (with timestamp):");
    for o in orders {
        println!(
            "  #{} - {} for {} @ {}",
            o.id,
            o.product,
            o.customer,
            o.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn print_report(outcome: &PipelineOutcome, window: &TimeWindow) {
    let network = &outcome.network;

    println!(
        "\nOrders in window ({} to {}): {}",
        window.start.date(),
        window.end.date(),
        network.orders.len()
    );
    println!("Active customers: {:?}", network.active_customers);

    println!("\nAssignments depot -> customer:");
    for (customer, a) in &outcome.assignment {
        println!("  {} <- {} ({})", customer, a.depot, format_km(a.distance));
    }

    if outcome.paths.negative_cycle_depots.is_empty() {
        println!("\nNo negative cycles in the active graph.");
    } else {
        println!(
            "\n{} {:?}",
            "WARNING: negative cycles reachable from".red(),
            outcome.paths.negative_cycle_depots
        );
        println!(
            "{}",
            "Distances from these depots are not reliable for every reachable location.".red()
        );
    }

    println!("\nRoute and cost from the assigned depot per order:");
    for o in &network.orders {
        let Some(a) = outcome.assignment.get(&o.customer) else {
            println!(
                " Order #{}: {} for {} | {}",
                o.id,
                o.product,
                o.customer,
                "unassigned (not connected)".red()
            );
            continue;
        };
        let entry = outcome
            .paths
            .for_depot(&a.depot)
            .and_then(|d| d.to_customer(&o.customer));
        match entry.and_then(|e| e.path.as_ref().map(|p| (e, p))) {
            Some((e, path)) => {
                let trust = if e.trusted { "" } else { " (untrusted)" };
                println!(
                    " Order #{}: {} for {} <- {} | distance: {}{} | route: {}",
                    o.id,
                    o.product,
                    o.customer,
                    a.depot,
                    format_km(e.distance),
                    trust,
                    format_path(path)
                );
            }
            None => println!(
                " Order #{}: {} for {} <- {} | route not found",
                o.id, o.product, o.customer, a.depot
            ),
        }
    }

    println!("\nShortest distances (active locations only):");
    for depot in &network.depots {
        for customer in &network.active_customers {
            let d = outcome.matrix.distance(depot, customer);
            if d.is_finite() {
                println!("  {} -> {}: {}", depot, customer, format_km(d));
            }
        }
    }

    print_analysis(&outcome.analysis);

    println!("\n=== Delivery routes per depot (approximate TSP on the active graph) ===");
    for depot_route in &outcome.routes {
        match &depot_route.route {
            None => println!(" {} -> no pending deliveries.", depot_route.depot),
            Some(route) => {
                println!(
                    " {} delivers to: {}",
                    depot_route.depot,
                    depot_route.customers.join(", ")
                );
                let line = format!(
                    "  {} route: {} ({})",
                    match route.method {
                        RouteMethod::Heuristic => "TSP",
                        RouteMethod::Fallback => "Fallback (by distance)",
                    },
                    format_path(&route.stops),
                    format_km(route.length)
                );
                match route.method {
                    RouteMethod::Heuristic => println!("{}", line.green()),
                    RouteMethod::Fallback => println!("{}", line.yellow()),
                }
            }
        }
    }
}

fn print_analysis(analysis: &Analysis) {
    println!("\n--- GLOBAL ANALYSIS ---");
    match &analysis.busiest_customer {
        Some((customer, n)) => println!("Customer with most orders: {} ({})", customer, n),
        None => println!("Customer with most orders: none"),
    }
    match &analysis.farthest_customer {
        Some((customer, d)) => {
            println!("Farthest customer from any depot: {} ({})", customer, format_km(*d))
        }
        None => println!("Farthest customer from any depot: none"),
    }
    println!("Pairs with unusual distance (z-score):");
    for p in &analysis.anomalous_pairs {
        println!(
            "  {} <-> {}: {} (z={:.2})",
            p.from,
            p.to,
            format_km(p.distance),
            p.z_score
        );
    }
    println!("\nSuggestions:");
    for s in &analysis.suggestions {
        println!("  {:?} - {} | {}", s.kind, s.rationale, s.proposal);
    }
}
