pub mod call;
pub mod filter;
pub mod lod;
pub mod oracle;
pub mod validate;

pub use call::*;
pub use filter::*;
pub use lod::*;
pub use oracle::*;
pub use validate::*;
