pub mod convert;
pub mod init;
pub mod palette;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// treekmz - Street tree survey to KMZ converter
#[derive(Parser, Debug)]
#[command(name = "treekmz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./treekmz.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a survey table into a KMZ archive
    Convert(convert::ConvertArgs),

    /// Check a survey table without writing anything
    Validate(validate::ValidateArgs),

    /// Show the marker palette and preview recoloured markers
    Palette(palette::PaletteArgs),

    /// Write a default treekmz.yaml
    Init(init::InitArgs),
}

/// Load the configuration named on the command line, or look for one in
/// the working directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(Path::new(".")),
    }
}
