//! PNG output for recoloured markers.

use std::io::Write;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError, RgbaImage};

use crate::error::{ConvertError, Result};

/// Encode an image as PNG into any writer.
pub fn encode_png<W: Write>(image: &RgbaImage, out: W) -> std::result::Result<(), ImageError> {
    PngEncoder::new(out).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )
}

/// Write an image to a PNG file.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| ConvertError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to create PNG: {}", e),
    })?;

    let mut out = std::io::BufWriter::new(file);
    encode_png(image, &mut out).map_err(|source| ConvertError::ImageEncode {
        name: path.display().to_string(),
        source,
    })?;
    out.flush()?;

    Ok(())
}
