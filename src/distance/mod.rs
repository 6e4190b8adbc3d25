pub mod matrix;
pub mod shortest_path;
