#![forbid(unsafe_code)]

//! Board configuration.
//!
//! All fields are optional; unset fields fall back to the renderer defaults.
//! Sources, in the order a host usually layers them:
//!
//! - JSON (`{"palette":"red","canvas_size":300}`) via [`BoardConfig::from_json`];
//! - environment variables via [`BoardConfig::from_env`]:
//!
//! | Variable                  | Field           |
//! |---------------------------|-----------------|
//! | `CLOCKFACE_PALETTE`       | `palette`       |
//! | `CLOCKFACE_CANVAS_SIZE`   | `canvas_size`   |
//! | `CLOCKFACE_CIRCLE_RADIUS` | `circle_radius` |
//! | `CLOCKFACE_STREAM_URL`    | `stream_url`    |
//!
//! Combine sources with [`BoardConfig::or`].

use std::env;

use clockface_render::{Palette, SegmentConfig, SegmentRenderer};
use serde::Deserialize;

use crate::error::{BoardError, BoardResult};

const ENV_PALETTE: &str = "CLOCKFACE_PALETTE";
const ENV_CANVAS_SIZE: &str = "CLOCKFACE_CANVAS_SIZE";
const ENV_CIRCLE_RADIUS: &str = "CLOCKFACE_CIRCLE_RADIUS";
const ENV_STREAM_URL: &str = "CLOCKFACE_STREAM_URL";

/// Settings for a [`ClockBoard`](crate::board::ClockBoard).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Clock color palette.
    pub palette: Option<Palette>,
    /// Clock canvas edge in pixels.
    pub canvas_size: Option<u32>,
    /// Clock circle radius in pixels.
    pub circle_radius: Option<u32>,
    /// Event-stream endpoint the host should connect to.
    pub stream_url: Option<String>,
}

impl BoardConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> BoardResult<Self> {
        serde_json::from_str(text).map_err(|err| BoardError::config("<json>", text, err))
    }

    /// Read the `CLOCKFACE_*` environment variables.
    pub fn from_env() -> BoardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BoardResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let palette = get(ENV_PALETTE)
            .map(|v| v.parse::<Palette>().map_err(|err| BoardError::config(ENV_PALETTE, &v, err)))
            .transpose()?;
        let canvas_size = get(ENV_CANVAS_SIZE)
            .map(|v| parse_pixels(ENV_CANVAS_SIZE, &v))
            .transpose()?;
        let circle_radius = get(ENV_CIRCLE_RADIUS)
            .map(|v| parse_pixels(ENV_CIRCLE_RADIUS, &v))
            .transpose()?;

        Ok(Self {
            palette,
            canvas_size,
            circle_radius,
            stream_url: get(ENV_STREAM_URL),
        })
    }

    /// Fill unset fields from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            palette: self.palette.or(fallback.palette),
            canvas_size: self.canvas_size.or(fallback.canvas_size),
            circle_radius: self.circle_radius.or(fallback.circle_radius),
            stream_url: self.stream_url.or(fallback.stream_url),
        }
    }

    /// Renderer base configuration for these settings.
    #[must_use]
    pub fn segment_config(&self) -> SegmentConfig {
        SegmentConfig {
            canvas_size: self.canvas_size,
            circle_radius: self.circle_radius,
            palette: self.palette,
            ..SegmentConfig::new()
        }
    }

    /// Renderer for these settings.
    #[must_use]
    pub fn renderer(&self) -> SegmentRenderer {
        SegmentRenderer::with_base(self.segment_config())
    }
}

fn parse_pixels(key: &str, value: &str) -> BoardResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(BoardError::config(key, value, "must be positive")),
        Ok(px) => Ok(px),
        Err(err) => Err(BoardError::config(key, value, err)),
    }
}
