#![forbid(unsafe_code)]

//! Wedge rasterization.
//!
//! The circle is split into `segments` equal slices. Slice 0 starts at the
//! top (angle `-π/2`) and slices proceed clockwise. Each slice is a wedge
//! from the centre to the arc:
//!
//! 1. Fill with the segment color if `i < filled_segments`, else the empty
//!    color.
//! 2. Stroke the wedge outline (both radii and the arc) with the border color,
//!    [`BORDER_WIDTH`] pixels wide and centred on the outline.
//!
//! Pixels are sampled at their centres with no anti-aliasing. Anything outside
//! every wedge and stroke stays fully transparent. Zero segments yields a
//! blank canvas.

use std::f64::consts::{FRAC_PI_2, TAU};

use image::RgbaImage;

use crate::color::PackedRgba;
use crate::config::{BORDER_WIDTH, ResolvedConfig};

/// Angle at which slice 0 begins.
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// Wedge layout for one resolved configuration.
#[derive(Debug, Clone, Copy)]
pub struct WedgeGeometry {
    center: f64,
    radius: f64,
    segments: u32,
    increment: f64,
    half_stroke: f64,
}

impl WedgeGeometry {
    /// Layout for `config`. Returns `None` when there are no slices.
    #[must_use]
    pub fn new(config: &ResolvedConfig) -> Option<Self> {
        if config.segments == 0 {
            return None;
        }
        Some(Self {
            center: f64::from(config.canvas_size) / 2.0,
            radius: f64::from(config.circle_radius),
            segments: config.segments,
            increment: TAU / f64::from(config.segments),
            half_stroke: BORDER_WIDTH / 2.0,
        })
    }

    /// Angular width of one slice.
    #[inline]
    pub const fn increment(&self) -> f64 {
        self.increment
    }

    /// Slice containing the direction of `(dx, dy)` from the centre.
    ///
    /// `dy` grows downwards, so increasing angle is clockwise on screen.
    #[must_use]
    pub fn slice_at(&self, dx: f64, dy: f64) -> u32 {
        let turned = (dy.atan2(dx) - START_ANGLE).rem_euclid(TAU);
        let idx = (turned / self.increment).floor() as u32;
        idx.min(self.segments - 1)
    }

    /// Pixel at the middle of slice `i`, `fraction` of the way out to the arc.
    #[must_use]
    pub fn sample_point(&self, i: u32, fraction: f64) -> (u32, u32) {
        let angle = START_ANGLE + self.increment * (f64::from(i) + 0.5);
        let r = self.radius * fraction;
        let x = self.center + r * angle.cos();
        let y = self.center + r * angle.sin();
        (x.max(0.0).floor() as u32, y.max(0.0).floor() as u32)
    }

    /// Whether a point at offset `(dx, dy)` lies on any wedge outline.
    fn on_stroke(&self, dx: f64, dy: f64, dist: f64, slice: u32) -> bool {
        if (dist - self.radius).abs() <= self.half_stroke {
            return true;
        }
        let start = START_ANGLE + self.increment * f64::from(slice);
        self.ray_distance(dx, dy, start) <= self.half_stroke
            || self.ray_distance(dx, dy, start + self.increment) <= self.half_stroke
    }

    /// Distance from `(dx, dy)` to the radius drawn at `angle`.
    fn ray_distance(&self, dx: f64, dy: f64, angle: f64) -> f64 {
        let (ux, uy) = (angle.cos(), angle.sin());
        let along = dx * ux + dy * uy;
        if along <= 0.0 {
            dx.hypot(dy)
        } else if along >= self.radius {
            (dx - ux * self.radius).hypot(dy - uy * self.radius)
        } else {
            (dx * uy - dy * ux).abs()
        }
    }
}

/// Rasterize a clock into an RGBA image.
#[must_use]
pub fn rasterize(config: &ResolvedConfig) -> RgbaImage {
    let size = config.canvas_size;
    let mut image = RgbaImage::new(size, size);
    let Some(geometry) = WedgeGeometry::new(config) else {
        return image;
    };

    let colors = config.colors;
    let filled = config.filled_segments;
    let outer = geometry.radius + geometry.half_stroke;

    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - geometry.center;
        let dy = f64::from(y) + 0.5 - geometry.center;
        let dist = dx.hypot(dy);
        if dist > outer {
            continue;
        }
        let slice = geometry.slice_at(dx, dy);
        let color = if geometry.on_stroke(dx, dy, dist, slice) {
            colors.border
        } else if dist <= geometry.radius {
            if slice < filled {
                colors.segment
            } else {
                colors.empty
            }
        } else {
            PackedRgba::TRANSPARENT
        };
        *px = color.into();
    }
    image
}
