//! Core domain types for treekmz.
//!
//! - `Colour` - RGBA colour values compared component by component
//! - `Palette` - the ordered marker colours plus the paint sentinel
//! - `Coordinate` - a point parsed from a `lat,lon` field

mod colour;
mod coord;
mod palette;

pub use colour::Colour;
pub use coord::Coordinate;
pub use palette::Palette;
