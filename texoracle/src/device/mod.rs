pub mod service;
pub mod software;

pub use service::*;
pub use software::*;
