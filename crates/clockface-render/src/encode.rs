#![forbid(unsafe_code)]

//! PNG encoding and `data:` URI output.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::RenderError;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// An encoded clock image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl RenderedImage {
    /// PNG-encode a raster.
    pub fn encode(raster: &RgbaImage) -> Result<Self, RenderError> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas);
        }
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(raster.clone())
            .write_to(&mut out, ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        Ok(Self {
            width,
            height,
            png: out.into_inner(),
        })
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw PNG bytes.
    #[inline]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` URI usable as an image source.
    #[must_use]
    pub fn data_uri(&self) -> String {
        let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + self.png.len() * 4 / 3 + 4);
        uri.push_str(DATA_URI_PREFIX);
        STANDARD.encode_string(&self.png, &mut uri);
        uri
    }
}

/// Decode a PNG `data:` URI back into pixels.
///
/// Returns `None` for anything that is not a base64 PNG data URI.
#[must_use]
pub fn decode_data_uri(uri: &str) -> Option<RgbaImage> {
    let payload = uri.strip_prefix(DATA_URI_PREFIX)?;
    let bytes = STANDARD.decode(payload).ok()?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png).ok()?;
    Some(image.to_rgba8())
}
