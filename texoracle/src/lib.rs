pub mod calibration;
pub mod device;
pub mod error;
pub mod math;
pub mod sampling;
pub mod texture;
pub mod verify;

pub use error::*;
