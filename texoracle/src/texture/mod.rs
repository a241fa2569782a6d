pub mod address;
pub mod codec;
pub mod color;
pub mod cube;
pub mod format;
pub mod texture;

pub use address::*;
pub use codec::*;
pub use color::*;
pub use cube::*;
pub use format::*;
pub use texture::*;
