//! Data types for the tile map pipeline.

mod options;
mod point;
mod record;

pub use options::*;
pub use point::*;
pub use record::*;
