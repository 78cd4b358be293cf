#![forbid(unsafe_code)]

//! Segmented-circle renderer.
//!
//! Turns a segment count, a fill count and a color set into a raster image
//! of a circle split into equal wedges, encoded as PNG and exposed as a
//! `data:` URI for the host display.
//!
//! ```
//! use clockface_render::{SegmentConfig, SegmentRenderer};
//!
//! let renderer = SegmentRenderer::new();
//! let image = renderer
//!     .render(&SegmentConfig::new().segments(4).filled_segments(2))
//!     .unwrap();
//! assert!(image.data_uri().starts_with("data:image/png;base64,"));
//! ```

pub mod color;
pub mod config;
pub mod encode;
pub mod error;
pub mod raster;

pub use color::{PackedRgba, Palette, SegmentColors};
pub use config::{ResolvedConfig, SegmentConfig};
pub use encode::RenderedImage;
pub use error::RenderError;

/// Renders clocks on top of a base configuration.
///
/// The base supplies canvas size, radius and colors; each call supplies the
/// counts. Fields set on the per-call config win over the base.
#[derive(Debug, Clone, Default)]
pub struct SegmentRenderer {
    base: SegmentConfig,
}

impl SegmentRenderer {
    /// Renderer with all defaults (600 px canvas, green palette).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with a base configuration.
    #[must_use]
    pub fn with_base(base: SegmentConfig) -> Self {
        Self { base }
    }

    /// The base configuration.
    #[must_use]
    pub fn base(&self) -> &SegmentConfig {
        &self.base
    }

    /// Rasterize and encode `config` layered over the base.
    pub fn render(&self, config: &SegmentConfig) -> Result<RenderedImage, RenderError> {
        let resolved = config.or(&self.base).resolve();
        render(&resolved)
    }

    /// Render a clock with `total` slices of which `filled` are filled.
    pub fn render_clock(&self, total: u32, filled: u32) -> Result<RenderedImage, RenderError> {
        self.render(&SegmentConfig::new().segments(total).filled_segments(filled))
    }
}

/// Rasterize and PNG-encode a fully resolved configuration.
pub fn render(config: &ResolvedConfig) -> Result<RenderedImage, RenderError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "segment_render",
        size = config.canvas_size,
        segments = config.segments,
        filled = config.filled_segments
    )
    .entered();

    let raster = raster::rasterize(config);
    RenderedImage::encode(&raster)
}
