pub mod cache;
pub mod calibrator;
pub mod curve;

pub use cache::*;
pub use calibrator::*;
pub use curve::*;
