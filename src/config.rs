//! Project configuration (treekmz.yaml) parsing.
//!
//! The configuration holds everything a conversion needs besides the input
//! table: the delimiter, header labels, palette and marker icon.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::convert::{ConvertOptions, Converter, HeaderLabels, DEFAULT_NAME};
use crate::error::{ConvertError, Result};
use crate::render::MarkerIcon;
use crate::types::{Colour, Palette};

/// Configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "treekmz.yaml";

/// Project configuration loaded from treekmz.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Single-character field delimiter.
    pub delimiter: String,

    /// Name of the KML document and folder.
    pub name: String,

    /// Header labels of the required columns.
    pub labels: HeaderLabels,

    /// Marker colours in assignment order, as hex strings.
    pub palette: Vec<String>,

    /// Colour in the marker icon that gets replaced.
    pub paint: String,

    /// Marker icon PNG; the built-in flower pin when unset.
    /// Relative paths are resolved against the configuration file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,

    /// Directory archives are written to.
    /// Relative paths are resolved against the configuration file.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let palette = Palette::default_palette();
        Self {
            delimiter: ";".to_string(),
            name: DEFAULT_NAME.to_string(),
            labels: HeaderLabels::default(),
            palette: palette.iter().map(|c| c.to_string()).collect(),
            paint: palette.paint().to_string(),
            icon: None,
            output: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Relative `icon` and `output` paths are rebased onto the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        let mut config = Self::parse(&content)?;
        if let Some(dir) = path.parent() {
            if let Some(icon) = config.icon.as_mut().filter(|icon| icon.is_relative()) {
                *icon = dir.join(&*icon);
            }
            if config.output.is_relative() {
                config.output = dir.join(&config.output);
            }
        }
        Ok(config)
    }

    /// Load `treekmz.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| ConvertError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConvertError::Parse {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }

    /// The delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        parse_delimiter(&self.delimiter)
    }

    /// Resolve the palette and paint colour.
    pub fn build_palette(&self) -> Result<Palette> {
        let colours = self
            .palette
            .iter()
            .map(|hex| Colour::from_hex(hex))
            .collect::<Result<Vec<_>>>()?;
        Palette::new(colours, Colour::from_hex(&self.paint)?)
    }

    /// Decode the configured marker icon, or the built-in one.
    pub fn marker_icon(&self) -> Result<MarkerIcon> {
        match &self.icon {
            Some(path) => MarkerIcon::open(path),
            None => MarkerIcon::builtin(),
        }
    }

    pub fn convert_options(&self) -> Result<ConvertOptions> {
        Ok(ConvertOptions {
            delimiter: self.delimiter_byte()?,
            labels: self.labels.clone(),
            name: self.name.clone(),
        })
    }

    /// Build a ready-to-use converter; the icon is decoded here.
    pub fn converter(&self) -> Result<Converter> {
        let converter = Converter::new(self.build_palette()?, self.marker_icon()?);
        Ok(converter.with_options(self.convert_options()?))
    }
}

/// Parse a delimiter given as a single ASCII character.
///
/// `\t` and `tab` are accepted for tab-separated input.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    match s.as_bytes() {
        [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' && *byte != b'\r' => Ok(*byte),
        _ => Err(ConvertError::Parse {
            message: format!("Invalid delimiter: {:?}", s),
            help: Some("Use a single ASCII character such as ';' or ','".to_string()),
        }),
    }
}
