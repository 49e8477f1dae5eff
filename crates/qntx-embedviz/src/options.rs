//! Option sets for the two entry points.
//!
//! Every field has a named default, so callers (or JSON configs) may
//! override any subset.

use crate::edges::EdgeStyle;
use crate::error::{Result, VizError};
use crate::figure::Orientation;
use crate::palette::{ColorMap, EdgeColor, Rgb};
use crate::recall::SelfMatch;
use serde::{Deserialize, Serialize};

fn default_color_map() -> ColorMap {
    ColorMap::Tab10
}
fn default_embedding_resolution() -> (u32, u32) {
    (800, 800)
}
fn default_intra_width() -> f32 {
    0.5
}
fn default_inter_width() -> f32 {
    0.3
}
fn default_edge_alpha() -> f32 {
    0.2
}
fn default_intra_color() -> EdgeColor {
    EdgeColor::Palette
}
fn default_inter_color() -> EdgeColor {
    EdgeColor::Fixed(Rgb::BLACK)
}
fn default_marker_size() -> f32 {
    3.0
}
fn default_legend_label_size() -> f32 {
    12.0
}
fn default_k() -> usize {
    10
}
fn default_recall_resolution() -> (u32, u32) {
    (800, 600)
}
fn default_bins() -> usize {
    10
}
fn default_histogram_color() -> Rgb {
    Rgb(0x1f, 0x77, 0xb4)
}

/// Options for `render_embedding`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingStyle {
    #[serde(default = "default_color_map")]
    pub color_map: ColorMap,
    /// Figure size in pixels (width, height)
    #[serde(default = "default_embedding_resolution")]
    pub resolution: (u32, u32),
    #[serde(default = "default_intra_width")]
    pub intra_width: f32,
    #[serde(default = "default_inter_width")]
    pub inter_width: f32,
    #[serde(default = "default_edge_alpha")]
    pub edge_alpha: f32,
    #[serde(default = "default_intra_color")]
    pub intra_color: EdgeColor,
    #[serde(default = "default_inter_color")]
    pub inter_color: EdgeColor,
    /// Overrides per-cluster point colors when set
    #[serde(default)]
    pub point_color: Option<Rgb>,
    #[serde(default = "default_marker_size")]
    pub marker_size: f32,
    #[serde(default = "default_legend_label_size")]
    pub legend_label_size: f32,
    #[serde(default)]
    pub legend_orientation: Orientation,
}

impl Default for EmbeddingStyle {
    fn default() -> Self {
        Self {
            color_map: default_color_map(),
            resolution: default_embedding_resolution(),
            intra_width: default_intra_width(),
            inter_width: default_inter_width(),
            edge_alpha: default_edge_alpha(),
            intra_color: default_intra_color(),
            inter_color: default_inter_color(),
            point_color: None,
            marker_size: default_marker_size(),
            legend_label_size: default_legend_label_size(),
            legend_orientation: Orientation::default(),
        }
    }
}

impl EmbeddingStyle {
    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.resolution)?;
        validate_non_negative("intra_width", self.intra_width)?;
        validate_non_negative("inter_width", self.inter_width)?;
        validate_non_negative("marker_size", self.marker_size)?;
        if !(0.0..=1.0).contains(&self.edge_alpha) {
            return Err(VizError::invalid(format!(
                "edge_alpha must be in [0, 1], got {}",
                self.edge_alpha
            )));
        }
        if !(self.legend_label_size > 0.0) {
            return Err(VizError::invalid(format!(
                "legend_label_size must be positive, got {}",
                self.legend_label_size
            )));
        }
        Ok(())
    }

    pub fn edge_style(&self) -> EdgeStyle {
        EdgeStyle {
            intra_color: self.intra_color,
            inter_color: self.inter_color,
            intra_width: self.intra_width,
            inter_width: self.inter_width,
            alpha: self.edge_alpha,
        }
    }
}

/// Options for `compute_neighbor_recall`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallStyle {
    /// Neighbor count
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_recall_resolution")]
    pub resolution: (u32, u32),
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default = "default_histogram_color")]
    pub color: Rgb,
    #[serde(default)]
    pub self_match: SelfMatch,
}

impl Default for RecallStyle {
    fn default() -> Self {
        Self {
            k: default_k(),
            resolution: default_recall_resolution(),
            bins: default_bins(),
            color: default_histogram_color(),
            self_match: SelfMatch::default(),
        }
    }
}

impl RecallStyle {
    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks everything except `k`, which depends on the point count.
    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.resolution)?;
        if self.bins == 0 {
            return Err(VizError::invalid("bins must be at least 1"));
        }
        Ok(())
    }
}

fn validate_resolution((width, height): (u32, u32)) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(VizError::invalid(format!(
            "resolution must be non-zero, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

fn validate_non_negative(name: &str, value: f32) -> Result<()> {
    if !(value >= 0.0) {
        return Err(VizError::invalid(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedding_defaults() {
        let style = EmbeddingStyle::default();
        assert_eq!(style.resolution, (800, 800));
        assert_eq!(style.edge_alpha, 0.2);
        assert_eq!(style.inter_color, EdgeColor::Fixed(Rgb::BLACK));
        assert!(style.validate().is_ok());
    }

    #[test]
    fn default_inter_color_outside_cluster_palettes() {
        let EdgeColor::Fixed(inter) = EmbeddingStyle::default().inter_color else {
            panic!("inter-cluster edges should default to a fixed color");
        };
        for cmap in [ColorMap::Tab10, ColorMap::Viridis] {
            for n in 1..=64 {
                assert!(
                    !cmap.discrete(n).contains(&inter),
                    "{:?} with {} clusters yields the inter color",
                    cmap,
                    n
                );
            }
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let style = EmbeddingStyle::from_json(
            r##"{"edge_alpha": 0.5, "intra_color": {"kind": "fixed", "value": "#000000"}}"##,
        )
        .unwrap();
        assert_eq!(style.edge_alpha, 0.5);
        assert_eq!(style.intra_color, EdgeColor::Fixed(Rgb::BLACK));
        assert_eq!(style.marker_size, 3.0);
        assert_eq!(style.color_map, ColorMap::Tab10);
    }

    #[test]
    fn empty_json_equals_default() {
        assert_eq!(
            EmbeddingStyle::from_json("{}").unwrap(),
            EmbeddingStyle::default()
        );
        assert_eq!(RecallStyle::from_json("{}").unwrap(), RecallStyle::default());
    }

    #[test]
    fn recall_defaults() {
        let style = RecallStyle::default();
        assert_eq!(style.k, 10);
        assert_eq!(style.resolution, (800, 600));
        assert_eq!(style.self_match, SelfMatch::Include);
    }

    #[test]
    fn alpha_out_of_range() {
        let style = EmbeddingStyle {
            edge_alpha: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            style.validate(),
            Err(VizError::InvalidParameter(_))
        ));
    }

    #[test]
    fn negative_width() {
        let style = EmbeddingStyle {
            inter_width: -1.0,
            ..Default::default()
        };
        let err = style.validate().unwrap_err();
        assert!(err.to_string().contains("inter_width"));
    }

    #[test]
    fn zero_bins() {
        let style = RecallStyle {
            bins: 0,
            ..Default::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn bad_json_is_config_error() {
        let err = RecallStyle::from_json(r#"{"k": "ten"}"#).unwrap_err();
        assert!(matches!(err, VizError::Config(_)));
    }
}
