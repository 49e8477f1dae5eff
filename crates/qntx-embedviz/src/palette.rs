//! Colors, colormaps and edge color policy.

use crate::error::VizError;
use crate::labels::LabelVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 8-bit RGB color. Serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(0x80, 0x80, 0x80);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, VizError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(VizError::invalid(format!("invalid color '{}'", s)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| VizError::invalid(format!("invalid color '{}'", s)))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = VizError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

const TAB10: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
];

// Viridis anchors at t = 0, 0.25, 0.5, 0.75, 1
const VIRIDIS: [Rgb; 5] = [
    Rgb(0x44, 0x01, 0x54),
    Rgb(0x3b, 0x52, 0x8b),
    Rgb(0x21, 0x91, 0x8c),
    Rgb(0x5e, 0xc9, 0x62),
    Rgb(0xfd, 0xe7, 0x25),
];

/// Named colormaps available for cluster coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    /// Qualitative, 10 colors, cycles past 10 clusters
    #[default]
    Tab10,
    Viridis,
    /// White to black
    Greys,
}

impl ColorMap {
    /// Sample the continuous form of the map at `t` in [0, 1].
    pub fn sample(self, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMap::Tab10 => {
                let idx = ((t * TAB10.len() as f32) as usize).min(TAB10.len() - 1);
                TAB10[idx]
            }
            ColorMap::Viridis => {
                let scaled = t * (VIRIDIS.len() - 1) as f32;
                let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
                Rgb::lerp(VIRIDIS[lo], VIRIDIS[lo + 1], scaled - lo as f32)
            }
            ColorMap::Greys => Rgb::lerp(Rgb::WHITE, Rgb::BLACK, t),
        }
    }

    /// `n` discrete colors drawn from the map.
    pub fn discrete(self, n: usize) -> Vec<Rgb> {
        match self {
            ColorMap::Tab10 => (0..n).map(|i| TAB10[i % TAB10.len()]).collect(),
            _ if n <= 1 => vec![self.sample(0.0); n],
            _ => (0..n)
                .map(|i| self.sample(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}

/// Label spans up to this size get one palette slot per label value.
const DIRECT_SPAN_LIMIT: usize = 1024;

/// Cluster colors looked up by normalized label.
///
/// Dense label ranges index the colors directly, so a label keeps its color
/// when other labels are absent. Sparse ranges (span far beyond the number
/// of clusters) are keyed by rank among the distinct labels instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
    ranked: Option<Vec<usize>>,
}

impl Palette {
    /// Colors indexed directly by normalized label.
    pub fn from_colors(colors: Vec<Rgb>) -> Self {
        Self {
            colors,
            ranked: None,
        }
    }

    pub fn color(&self, label: usize) -> Option<Rgb> {
        let slot = match &self.ranked {
            Some(distinct) => distinct.binary_search(&label).ok()?,
            None => label,
        };
        self.colors.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// Default discrete palette for `labels`, sized to the label range unless
/// the labels are sparse.
pub fn default_palette(labels: &LabelVector, cmap: ColorMap) -> Palette {
    let distinct = labels.distinct();
    let span = labels.range();
    if span <= DIRECT_SPAN_LIMIT.max(2 * distinct.len()) {
        return Palette::from_colors(cmap.discrete(span));
    }
    Palette {
        colors: cmap.discrete(distinct.len()),
        ranked: Some(distinct),
    }
}

/// How an edge group picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EdgeColor {
    /// One color regardless of cluster
    Fixed(Rgb),
    /// The cluster's palette color
    Palette,
}

impl EdgeColor {
    /// Resolve to a concrete color for a group keyed by `label`.
    ///
    /// `Palette` with no label (the inter-cluster group) or a label outside
    /// the palette falls back to black, which Tab10 and Viridis never yield.
    pub fn resolve(self, palette: &Palette, label: Option<usize>) -> Rgb {
        match self {
            EdgeColor::Fixed(c) => c,
            EdgeColor::Palette => label
                .and_then(|l| palette.color(l))
                .unwrap_or(Rgb::BLACK),
        }
    }
}
