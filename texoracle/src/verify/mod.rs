pub mod diagnostics;
pub mod report;
pub mod tolerance;
pub mod verifier;

pub use diagnostics::*;
pub use report::*;
pub use tolerance::*;
pub use verifier::*;
