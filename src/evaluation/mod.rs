pub mod analysis;
pub mod fitness;
