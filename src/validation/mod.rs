//! Dry-run validation of survey tables and markers.
//!
//! Runs the same header resolution and row checks as a conversion but keeps
//! going after problems, collecting them as diagnostics. Used by
//! `treekmz validate` and `treekmz palette`.

mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::convert::{read_header, ConvertOptions};
use crate::error::{ConvertError, Result};
use crate::render::MarkerIcon;
use crate::types::{Coordinate, Palette};

/// Row-level diagnostics reported individually before being summarized.
const MAX_ROW_DIAGNOSTICS: usize = 10;

/// Scan a table without converting it.
///
/// Only read failures are returned as errors; schema problems become
/// diagnostics.
pub fn validate_table<R: Read>(input: R, options: &ConvertOptions) -> Result<ValidationResult> {
    let mut result = ValidationResult::new();
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut record = StringRecord::new();
    let columns = match read_header(&mut reader, &mut record, &options.labels) {
        Ok(columns) => columns,
        Err(ConvertError::Schema { missing }) => {
            for label in missing {
                result.push(
                    Diagnostic::error(
                        "treekmz::validate::missing-column",
                        format!("Header has no \"{}\" column", label),
                    )
                    .at_line(1),
                );
            }
            return Ok(result);
        }
        Err(e) => return Err(e),
    };
    let (widest_field, widest) = columns.widest();

    let mut short_rows = 0usize;
    let mut skipped_rows = 0usize;
    while reader.read_record(&mut record)? {
        result.rows += 1;
        let line = record.position().map_or(result.rows + 1, |p| p.line());

        if record.len() <= widest {
            short_rows += 1;
            if short_rows <= MAX_ROW_DIAGNOSTICS {
                result.push(
                    Diagnostic::error(
                        "treekmz::validate::short-row",
                        format!(
                            "Row has {} field(s), \"{}\" is column {}",
                            record.len(),
                            options.labels.label(widest_field),
                            widest + 1
                        ),
                    )
                    .at_line(line),
                );
            }
            continue;
        }

        if Coordinate::parse(&record[columns.coordinates]).is_none() {
            skipped_rows += 1;
            if skipped_rows <= MAX_ROW_DIAGNOSTICS {
                result.push(
                    Diagnostic::warning(
                        "treekmz::validate::coordinates",
                        format!(
                            "Row will be skipped: \"{}\" is not a lat,lon pair",
                            &record[columns.coordinates]
                        ),
                    )
                    .at_line(line),
                );
            }
            continue;
        }

        result.placemarks += 1;
    }

    if short_rows > MAX_ROW_DIAGNOSTICS {
        result.push(Diagnostic::error(
            "treekmz::validate::short-row",
            format!("{} more short row(s)", short_rows - MAX_ROW_DIAGNOSTICS),
        ));
    }
    if skipped_rows > MAX_ROW_DIAGNOSTICS {
        result.push(Diagnostic::warning(
            "treekmz::validate::coordinates",
            format!(
                "{} more row(s) without coordinates",
                skipped_rows - MAX_ROW_DIAGNOSTICS
            ),
        ));
    }

    Ok(result)
}

/// Check that the marker icon can actually be recoloured.
pub fn validate_marker(icon: &MarkerIcon, palette: &Palette) -> ValidationResult {
    let mut result = ValidationResult::new();

    if icon.paint_pixels(palette.paint()) == 0 {
        result.push(
            Diagnostic::warning(
                "treekmz::validate::no-paint",
                format!("Marker icon has no pixel of paint colour {}", palette.paint()),
            )
            .with_help("Every marker will look identical; set `paint` to a colour used in the icon"),
        );
    }

    result
}
