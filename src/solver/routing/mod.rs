pub mod optimizer;
pub mod tour;

pub use optimizer::*;
pub use tour::*;
