pub mod flow;
pub mod scoring;

pub use flow::*;
pub use scoring::*;
