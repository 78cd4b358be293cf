#![forbid(unsafe_code)]

//! Colors and the built-in clock palettes.

use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

/// RGBA color packed as `0xRRGGBBAA`.
///
/// Straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(text: &str) -> Result<Self, RenderError> {
        let invalid = || RenderError::InvalidColor(text.to_string());
        let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form, with `aa` appended when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r(),
                self.g(),
                self.b(),
                self.a()
            )
        }
    }
}

impl From<PackedRgba> for image::Rgba<u8> {
    fn from(color: PackedRgba) -> Self {
        image::Rgba([color.r(), color.g(), color.b(), color.a()])
    }
}

impl From<image::Rgba<u8>> for PackedRgba {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self::rgba(r, g, b, a)
    }
}

/// The three colors a clock is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentColors {
    /// Fill of filled wedges.
    pub segment: PackedRgba,
    /// Fill of empty wedges.
    pub empty: PackedRgba,
    /// Wedge outline.
    pub border: PackedRgba,
}

impl SegmentColors {
    /// Build a color set from hex strings.
    pub fn from_hex(segment: &str, empty: &str, border: &str) -> Result<Self, RenderError> {
        Ok(Self {
            segment: PackedRgba::from_hex(segment)?,
            empty: PackedRgba::from_hex(empty)?,
            border: PackedRgba::from_hex(border)?,
        })
    }
}

/// Built-in color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Palette {
    /// `#336633` on `#333333`, border `#669966`.
    #[default]
    Green,
    /// `#663333` on `#333333`, border `#996666`.
    Red,
    /// `#333366` on `#333333`, border `#666699`.
    Blue,
}

const EMPTY_GREY: PackedRgba = PackedRgba::rgb(0x33, 0x33, 0x33);

impl Palette {
    /// All built-in palettes.
    pub const ALL: [Self; 3] = [Self::Green, Self::Red, Self::Blue];

    /// The palette's color set.
    #[must_use]
    pub const fn colors(self) -> SegmentColors {
        match self {
            Self::Green => SegmentColors {
                segment: PackedRgba::rgb(0x33, 0x66, 0x33),
                empty: EMPTY_GREY,
                border: PackedRgba::rgb(0x66, 0x99, 0x66),
            },
            Self::Red => SegmentColors {
                segment: PackedRgba::rgb(0x66, 0x33, 0x33),
                empty: EMPTY_GREY,
                border: PackedRgba::rgb(0x99, 0x66, 0x66),
            },
            Self::Blue => SegmentColors {
                segment: PackedRgba::rgb(0x33, 0x33, 0x66),
                empty: EMPTY_GREY,
                border: PackedRgba::rgb(0x66, 0x66, 0x99),
            },
        }
    }

    /// Lowercase palette name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RenderError::UnknownPalette(s.to_string()))
    }
}
