#![forbid(unsafe_code)]

//! Segment configuration with explicit defaults.
//!
//! Every field of [`SegmentConfig`] is optional. `None` means "use the
//! default"; any provided value, zero included, is used as given.
//!
//! | Field             | Default |
//! |-------------------|--------:|
//! | `canvas_size`     | 600     |
//! | `circle_radius`   | 290     |
//! | `segments`        | 4       |
//! | `filled_segments` | 0       |
//! | `palette`         | green   |
//!
//! Explicit `colors` take precedence over `palette`.

use crate::color::{Palette, SegmentColors};

/// Default canvas edge length in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 600;
/// Default circle radius in pixels.
pub const DEFAULT_CIRCLE_RADIUS: u32 = 290;
/// Default slice count.
pub const DEFAULT_SEGMENTS: u32 = 4;
/// Default filled-slice count.
pub const DEFAULT_FILLED_SEGMENTS: u32 = 0;
/// Outline width in pixels.
pub const BORDER_WIDTH: f64 = 5.0;

/// Partial renderer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SegmentConfig {
    /// Canvas width and height in pixels.
    pub canvas_size: Option<u32>,
    /// Circle radius in pixels.
    pub circle_radius: Option<u32>,
    /// Total number of slices.
    pub segments: Option<u32>,
    /// Number of slices drawn filled, counted clockwise from the top.
    pub filled_segments: Option<u32>,
    /// Named palette.
    pub palette: Option<Palette>,
    /// Explicit colors, overriding `palette`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub colors: Option<SegmentColors>,
}

impl SegmentConfig {
    /// A config with every field unset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            canvas_size: None,
            circle_radius: None,
            segments: None,
            filled_segments: None,
            palette: None,
            colors: None,
        }
    }

    /// Set the canvas size.
    #[must_use]
    pub const fn canvas_size(mut self, px: u32) -> Self {
        self.canvas_size = Some(px);
        self
    }

    /// Set the circle radius.
    #[must_use]
    pub const fn circle_radius(mut self, px: u32) -> Self {
        self.circle_radius = Some(px);
        self
    }

    /// Set the slice count.
    #[must_use]
    pub const fn segments(mut self, n: u32) -> Self {
        self.segments = Some(n);
        self
    }

    /// Set the filled-slice count.
    #[must_use]
    pub const fn filled_segments(mut self, n: u32) -> Self {
        self.filled_segments = Some(n);
        self
    }

    /// Select a named palette.
    #[must_use]
    pub const fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Use explicit colors.
    #[must_use]
    pub const fn colors(mut self, colors: SegmentColors) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Fill unset fields from `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            canvas_size: self.canvas_size.or(fallback.canvas_size),
            circle_radius: self.circle_radius.or(fallback.circle_radius),
            segments: self.segments.or(fallback.segments),
            filled_segments: self.filled_segments.or(fallback.filled_segments),
            palette: self.palette.or(fallback.palette),
            colors: self.colors.or(fallback.colors),
        }
    }

    /// Apply defaults to every unset field.
    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        let colors = self
            .colors
            .unwrap_or_else(|| self.palette.unwrap_or_default().colors());
        ResolvedConfig {
            canvas_size: self.canvas_size.unwrap_or(DEFAULT_CANVAS_SIZE),
            circle_radius: self.circle_radius.unwrap_or(DEFAULT_CIRCLE_RADIUS),
            segments: self.segments.unwrap_or(DEFAULT_SEGMENTS),
            filled_segments: self.filled_segments.unwrap_or(DEFAULT_FILLED_SEGMENTS),
            colors,
        }
    }
}

/// Configuration with every value decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Canvas width and height in pixels.
    pub canvas_size: u32,
    /// Circle radius in pixels.
    pub circle_radius: u32,
    /// Total number of slices.
    pub segments: u32,
    /// Number of filled slices (not clamped to `segments`).
    pub filled_segments: u32,
    /// Colors to draw with.
    pub colors: SegmentColors,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        SegmentConfig::new().resolve()
    }
}
