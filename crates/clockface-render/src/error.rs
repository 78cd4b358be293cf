#![forbid(unsafe_code)]

//! Renderer errors.

use thiserror::Error;

/// Failures while producing a clock image.
///
/// Degenerate counts (zero segments, more filled than total) are not errors;
/// they render as defined, if odd, images.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The canvas has zero width or height and cannot be encoded.
    #[error("cannot encode an empty canvas")]
    EmptyCanvas,

    /// PNG encoding failed.
    #[error("png encode error: {0}")]
    Encode(#[source] image::ImageError),

    /// A color string was not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// A palette name did not match any built-in palette.
    #[error("unknown palette `{0}` (expected green, red or blue)")]
    UnknownPalette(String),
}
