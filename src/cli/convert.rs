//! Convert command implementation.
//!
//! Reads a survey table and writes a KMZ archive next to it (or wherever
//! `--output` points).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::convert::ConvertSummary;
use crate::error::{ConvertError, Result};
use crate::output::{display_path, plural, Printer};

/// Convert a survey table into a KMZ archive
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Delimited table to convert
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output archive (default: <output dir>/<input stem>.kmz)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Field delimiter, e.g. ';', ',' or '\t'
    #[arg(long, short)]
    pub delimiter: Option<String>,

    /// Marker icon PNG to recolour
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// Document name shown in map viewers
    #[arg(long)]
    pub name: Option<String>,

    /// Print the conversion summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ConvertArgs, mut config: Config, printer: &Printer) -> Result<()> {
    if let Some(delimiter) = &args.delimiter {
        config.delimiter = delimiter.clone();
    }
    if let Some(icon) = &args.icon {
        config.icon = Some(icon.clone());
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }

    let converter = config.converter()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, &config.output));

    printer.status("Reading", &display_path(&args.input));
    let input = File::open(&args.input).map_err(|e| ConvertError::Io {
        path: args.input.clone(),
        message: format!("Failed to open input: {}", e),
    })?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConvertError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    let file = File::create(&output).map_err(|e| ConvertError::Io {
        path: output.clone(),
        message: format!("Failed to create archive: {}", e),
    })?;

    let mut writer = BufWriter::new(file);
    let result = converter
        .convert(BufReader::new(input), &mut writer)
        .and_then(|summary| {
            writer.flush()?;
            Ok(summary)
        });
    drop(writer);

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            // A half-written archive is never left behind
            let _ = fs::remove_file(&output);
            return Err(e);
        }
    };

    report(&summary, &output, printer);
    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| ConvertError::Parse {
            message: format!("Failed to serialize summary: {}", e),
            help: None,
        })?;
        println!("{}", json);
    }

    Ok(())
}

/// `<dir>/<input stem>.kmz`
fn default_output(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trees");
    dir.join(format!("{}.kmz", stem))
}

fn report(summary: &ConvertSummary, output: &Path, printer: &Printer) {
    if summary.skipped > 0 {
        printer.warning(
            "Skipped",
            &format!("{} without coordinates", plural(summary.skipped, "row", "rows")),
        );
    }
    printer.status(
        "Placed",
        &format!(
            "{} in {}",
            plural(summary.placemarks, "tree", "trees"),
            plural(summary.categories, "category", "categories")
        ),
    );
    printer.status("Finished", &display_path(output));
}
