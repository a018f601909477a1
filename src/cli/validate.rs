//! Validate command implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::{validate_marker, validate_table, Severity, ValidationResult};

/// Check a survey table without writing anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Delimited table to check
    #[arg(required = true)]
    pub input: PathBuf,

    /// Field delimiter, e.g. ';', ',' or '\t'
    #[arg(long, short)]
    pub delimiter: Option<String>,
}

pub fn run(args: ValidateArgs, mut config: Config, printer: &Printer) -> Result<()> {
    if let Some(delimiter) = &args.delimiter {
        config.delimiter = delimiter.clone();
    }
    let options = config.convert_options()?;
    let palette = config.build_palette()?;
    let icon = config.marker_icon()?;

    let display = display_path(&args.input);
    printer.status("Checking", &display);

    let file = File::open(&args.input).map_err(|e| ConvertError::Io {
        path: args.input.clone(),
        message: format!("Failed to open input: {}", e),
    })?;
    let table = validate_table(BufReader::new(file), &options)?;

    print_diagnostics(&table, &display, printer);
    print_diagnostics(&validate_marker(&icon, &palette), "marker", printer);

    if table.has_errors() {
        return Err(ConvertError::Validation {
            message: format!(
                "{} has {}",
                display,
                plural(table.error_count(), "error", "errors")
            ),
            help: None,
        });
    }

    printer.status(
        "Valid",
        &format!(
            "{} of {} would be placed",
            plural(table.placemarks, "tree", "trees"),
            plural(table.rows, "row", "rows")
        ),
    );
    Ok(())
}

fn print_diagnostics(result: &ValidationResult, source: &str, printer: &Printer) {
    for d in result.iter() {
        let location = match d.line {
            Some(line) => format!("{}:{}", source, line),
            None => source.to_string(),
        };
        let message = format!("{} [{}] {}", location, d.code, d.message);
        match d.severity {
            Severity::Error => printer.error("error", &message),
            Severity::Warning => printer.warning("warning", &message),
        }
        if let Some(help) = &d.help {
            printer.info("help", help);
        }
    }
}
