//! Reference marker icon and recolouring.

use std::path::Path;

use image::{ColorType, ImageBuffer, Rgba, RgbaImage};

use crate::error::{ConvertError, Result};
use crate::types::Colour;

/// The built-in flower pin, painted with the default palette's paint colour.
const BUILTIN_ICON: &[u8] = include_bytes!("../../assets/flower.png");

/// A decoded reference marker.
///
/// Decoded once and only ever read; every recoloured marker is a new buffer.
#[derive(Debug, Clone)]
pub struct MarkerIcon {
    image: RgbaImage,
}

impl MarkerIcon {
    /// Decode the built-in marker.
    pub fn builtin() -> Result<Self> {
        Self::from_bytes(BUILTIN_ICON)
    }

    /// Decode a marker from encoded image bytes.
    ///
    /// Fails for images with more than 8 bits per channel.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(ConvertError::ImageDecode)?;
        let image = match decoded.color() {
            ColorType::Rgba8 | ColorType::Rgb8 | ColorType::La8 | ColorType::L8 => {
                decoded.into_rgba8()
            }
            other => {
                return Err(ConvertError::Parse {
                    message: format!("Unsupported marker icon colour type {:?}", other),
                    help: Some("Save the marker icon as an 8-bit PNG".to_string()),
                })
            }
        };
        Ok(Self { image })
    }

    /// Load a marker from an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ConvertError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read marker icon: {}", e),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Count the pixels that exactly match `paint`.
    pub fn paint_pixels(&self, paint: Colour) -> usize {
        let paint = paint.to_rgba();
        self.image.pixels().filter(|p| p.0 == paint).count()
    }

    /// Produce a copy with every `paint` pixel replaced by `target`.
    pub fn recoloured(&self, paint: Colour, target: Colour) -> RgbaImage {
        recolor(&self.image, paint, target)
    }
}

/// Replace every pixel exactly equal to `paint` with `target`.
///
/// All other pixels, alpha included, are copied unchanged.
pub fn recolor(source: &RgbaImage, paint: Colour, target: Colour) -> RgbaImage {
    let paint = paint.to_rgba();
    let target = Rgba(target.to_rgba());

    ImageBuffer::from_fn(source.width(), source.height(), |x, y| {
        let pixel = *source.get_pixel(x, y);
        if pixel.0 == paint {
            target
        } else {
            pixel
        }
    })
}
