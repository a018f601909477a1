use miette::Diagnostic;
use thiserror::Error;

/// Main error type for treekmz operations
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    #[diagnostic(code(treekmz::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(treekmz::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(treekmz::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(treekmz::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Missing required column(s): {}", missing.join(", "))]
    #[diagnostic(
        code(treekmz::schema),
        help("The first row must contain every configured header label, spelled exactly")
    )]
    Schema { missing: Vec<String> },

    #[error("Row {line} has {width} field(s) but \"{label}\" is column {}", .column + 1)]
    #[diagnostic(code(treekmz::schema::short_row))]
    RowTooShort {
        line: u64,
        width: usize,
        column: usize,
        label: String,
    },

    #[error("Failed to read input: {0}")]
    #[diagnostic(code(treekmz::input))]
    Csv(#[from] csv::Error),

    #[error("Failed to decode marker icon: {0}")]
    #[diagnostic(code(treekmz::image::decode), help("The marker icon must be a PNG image"))]
    ImageDecode(#[source] image::ImageError),

    #[error("Failed to encode marker {name}: {source}")]
    #[diagnostic(code(treekmz::image::encode))]
    ImageEncode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write archive: {0}")]
    #[diagnostic(code(treekmz::archive))]
    Archive(#[from] zip::result::ZipError),
}

impl ConvertError {
    /// True for errors caused by the shape of the input table.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::RowTooShort { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
