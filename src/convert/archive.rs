//! KMZ archive assembly.

use std::io::{Seek, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ConvertError, Result};
use crate::render::{encode_png, MarkerIcon};
use crate::types::Palette;

use super::kml::image_name;

/// Archive path of the KML document.
pub const DOCUMENT_NAME: &str = "doc.kml";

/// Writes the document and marker entries into a zip container.
///
/// Nothing is valid until `finish` returns; on any error the caller must
/// discard whatever reached the underlying writer.
pub struct ArchiveBuilder<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> ArchiveBuilder<W> {
    pub fn new(out: W) -> Self {
        Self {
            zip: ZipWriter::new(out),
        }
    }

    /// Start the document entry and return a writer for its body.
    pub fn document(&mut self) -> Result<&mut ZipWriter<W>> {
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(DOCUMENT_NAME, options)?;
        Ok(&mut self.zip)
    }

    /// Add one recoloured marker per palette entry.
    pub fn markers(&mut self, icon: &MarkerIcon, palette: &Palette) -> Result<()> {
        // PNG data is already deflated
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for (index, colour) in palette.iter().enumerate() {
            let name = image_name(index);
            let marker = icon.recoloured(palette.paint(), colour);

            self.zip.start_file(name.as_str(), options)?;
            encode_png(&marker, &mut self.zip)
                .map_err(|source| ConvertError::ImageEncode { name, source })?;
        }

        Ok(())
    }

    /// Write the central directory and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}
