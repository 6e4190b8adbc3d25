pub mod assignment;
pub mod pipeline;
pub mod routing;
