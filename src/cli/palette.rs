use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::convert::{image_name, style_id};
use crate::error::{ConvertError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::write_png;
use crate::validation::validate_marker;

/// Show the marker palette and preview recoloured markers
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Marker icon PNG to check instead of the configured one
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// Write the recoloured markers to this directory
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

pub fn run(args: PaletteArgs, mut config: Config, printer: &Printer) -> Result<()> {
    if let Some(icon) = &args.icon {
        config.icon = Some(icon.clone());
    }
    let palette = config.build_palette()?;
    let icon = config.marker_icon()?;

    printer.status(
        "Palette",
        &format!(
            "{}, paint {}",
            plural(palette.len(), "colour", "colours"),
            palette.paint()
        ),
    );

    let painted = icon.paint_pixels(palette.paint());
    for d in validate_marker(&icon, &palette).iter() {
        printer.warning("warning", &d.message);
    }

    // One line per palette entry on stdout
    for (index, colour) in palette.iter().enumerate() {
        println!("{}\t{}\t{}", style_id(index), colour, image_name(index));
    }

    if let Some(dir) = &args.preview {
        fs::create_dir_all(dir).map_err(|e| ConvertError::Io {
            path: dir.clone(),
            message: format!("Failed to create preview directory: {}", e),
        })?;

        for (index, colour) in palette.iter().enumerate() {
            let marker = icon.recoloured(palette.paint(), colour);
            let path = dir.join(format!("flower-{}.png", index));
            write_png(&marker, &path)?;
        }

        printer.status(
            "Wrote",
            &format!(
                "{} ({} recoloured each) to {}",
                plural(palette.len(), "marker", "markers"),
                plural(painted, "pixel", "pixels"),
                display_path(dir)
            ),
        );
    }

    Ok(())
}
