use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Stroke pattern of a band line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Dash pattern as alternating on/off lengths in pixels. Empty for solid.
    #[must_use]
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[6.0, 4.0],
            Self::Dotted => &[2.0, 4.0],
        }
    }
}

/// An opaque RGB color, written `#RRGGBB` by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgba(r, g, b, alpha)` string.
    #[must_use]
    pub fn to_rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_owned());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

const BLUE: Color = Color::rgb(0x29, 0x62, 0xFF);
const ORANGE: Color = Color::rgb(0xFF, 0x6D, 0x00);

/// One of the three band lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Basis,
    Upper,
    Lower,
}

impl Band {
    pub const ALL: [Self; 3] = [Self::Basis, Self::Upper, Self::Lower];
}

/// Resolved line appearance for one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
}

impl Stroke {
    #[must_use]
    pub fn dash_pattern(&self) -> &'static [f64] {
        self.style.dash_pattern()
    }
}

/// Resolved background fill for one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Fill {
    #[must_use]
    pub fn css(&self) -> String {
        self.color.to_rgba(self.alpha)
    }
}

/// Overlay styling as the host's settings panel sends it.
///
/// Styling is never part of the computed bands: it is passed to every draw
/// call, so changing it only needs a redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSettings {
    pub basis_visible: bool,
    pub basis_color: Color,
    pub basis_width: f64,
    pub basis_style: LineStyle,
    pub upper_visible: bool,
    pub upper_color: Color,
    pub upper_width: f64,
    pub upper_style: LineStyle,
    pub lower_visible: bool,
    pub lower_color: Color,
    pub lower_width: f64,
    pub lower_style: LineStyle,
    pub background_visible: bool,
    pub background_color: Color,
    /// Percent, `0..=100`.
    pub background_opacity: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            basis_visible: true,
            basis_color: BLUE,
            basis_width: 2.0,
            basis_style: LineStyle::Solid,
            upper_visible: true,
            upper_color: ORANGE,
            upper_width: 1.0,
            upper_style: LineStyle::Solid,
            lower_visible: true,
            lower_color: BLUE,
            lower_width: 1.0,
            lower_style: LineStyle::Solid,
            background_visible: true,
            background_color: BLUE,
            background_opacity: 10.0,
        }
    }
}

impl StyleSettings {
    /// Stroke for `band`, or `None` if the line is hidden.
    #[must_use]
    pub fn stroke(&self, band: Band) -> Option<Stroke> {
        let (visible, color, width, style) = match band {
            Band::Basis => (
                self.basis_visible,
                self.basis_color,
                self.basis_width,
                self.basis_style,
            ),
            Band::Upper => (
                self.upper_visible,
                self.upper_color,
                self.upper_width,
                self.upper_style,
            ),
            Band::Lower => (
                self.lower_visible,
                self.lower_color,
                self.lower_width,
                self.lower_style,
            ),
        };

        visible.then_some(Stroke {
            color,
            width,
            style,
        })
    }

    /// Background fill, or `None` if hidden.
    #[must_use]
    pub fn fill(&self) -> Option<Fill> {
        self.background_visible.then(|| Fill {
            color: self.background_color,
            alpha: (self.background_opacity / 100.0).clamp(0.0, 1.0),
        })
    }
}
