//! # smartcoffee
//!
//! Delivery planning for a small multi-depot coffee network: orders are
//! filtered to a time window, each active customer is assigned to its nearest
//! depot by shortest path, and every depot gets an approximate delivery route.
//!
//! - [`domain`]: location graph and data types
//! - [`fixtures`]: base network and order simulation
//! - [`setup`]: active subgraph extraction
//! - [`distance`]: Bellman-Ford, Dijkstra and Floyd-Warshall
//! - [`solver`]: depot assignment, route optimisation and the pipeline driver
//! - [`evaluation`]: route length and statistical analysis
//! - [`render`]: route drawing

pub mod config;
pub mod distance;
pub mod domain;
pub mod evaluation;
pub mod fixtures;
pub mod render;
pub mod setup;
pub mod solver;
pub mod utils;
