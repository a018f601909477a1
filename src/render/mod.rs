//! Marker rendering for treekmz.
//!
//! Decodes the reference marker, recolours it per palette entry and encodes
//! the results as PNG.

mod marker;
mod png;

pub use marker::{recolor, MarkerIcon};
pub use png::{encode_png, write_png};
