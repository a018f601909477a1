//! treekmz - Street tree survey to KMZ converter
//!
//! A library for turning delimited tree survey tables into KMZ archives:
//! one coloured placemark per tree, coloured by species, with the marker
//! images bundled alongside the KML document.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod render;
pub mod types;
pub mod validation;

pub use config::{Config, CONFIG_FILENAME};
pub use convert::{
    CategoryColours, ColumnIndex, ConvertOptions, ConvertSummary, Converter, HeaderLabels,
    RequiredField, Swatch,
};
pub use error::{ConvertError, Result};
pub use render::{recolor, MarkerIcon};
pub use types::{Colour, Coordinate, Palette};
pub use validation::{validate_marker, validate_table, Diagnostic, Severity, ValidationResult};
