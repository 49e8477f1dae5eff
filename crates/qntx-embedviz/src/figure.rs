//! The plotting surface contract and an in-memory figure that records it.
//!
//! Rendering code only talks to [`PlotSurface`]. [`Figure`] is the handle
//! returned by the entry points: a record of axes and layers in draw order,
//! which a backend (see the `svg` feature) can turn into an image.

use crate::palette::Rgb;
use serde::{Deserialize, Serialize};

/// Histogram bar height mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    Count,
    /// Bars integrate to 1 over the histogram range
    Density,
}

/// Legend layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub marker: Marker,
    pub color: Rgb,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub orientation: Orientation,
    pub label_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramLayer {
    pub values: Vec<f32>,
    pub bins: usize,
    pub range: (f32, f32),
    pub normalization: Normalization,
    pub color: Rgb,
}

impl HistogramLayer {
    /// Left edge of each bin followed by the right edge of the last one.
    pub fn bin_edges(&self) -> Vec<f32> {
        let (lo, hi) = self.range;
        let width = (hi - lo) / self.bins as f32;
        (0..=self.bins).map(|b| lo + b as f32 * width).collect()
    }

    /// Bar heights. Values outside the range are ignored; the last bin is
    /// closed on the right so `hi` itself is counted.
    pub fn heights(&self) -> Vec<f32> {
        let (lo, hi) = self.range;
        let mut counts = vec![0usize; self.bins];
        if self.bins == 0 || hi <= lo {
            return vec![0.0; self.bins];
        }
        let width = (hi - lo) / self.bins as f32;

        for &v in &self.values {
            if !(lo..=hi).contains(&v) {
                continue;
            }
            let bin = (((v - lo) / width) as usize).min(self.bins - 1);
            counts[bin] += 1;
        }

        let total: usize = counts.iter().sum();
        match self.normalization {
            Normalization::Count => counts.iter().map(|&c| c as f32).collect(),
            Normalization::Density if total == 0 => vec![0.0; self.bins],
            Normalization::Density => counts
                .iter()
                .map(|&c| c as f32 / (total as f32 * width))
                .collect(),
        }
    }
}

/// One draw call as recorded by an [`Axes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// NaN entries break the line
    Polyline {
        xs: Vec<f32>,
        ys: Vec<f32>,
        style: LineStyle,
    },
    Scatter {
        xs: Vec<f32>,
        ys: Vec<f32>,
        colors: Vec<Rgb>,
        marker_size: f32,
    },
    Histogram(HistogramLayer),
}

/// The drawing operations rendering code needs from a plot backend.
pub trait PlotSurface {
    /// Draw a polyline; non-finite coordinates break it into segments.
    fn polyline(&mut self, xs: &[f32], ys: &[f32], style: LineStyle);

    /// Draw one marker per point with a per-point color.
    fn scatter(&mut self, xs: &[f32], ys: &[f32], colors: &[Rgb], marker_size: f32);

    fn histogram(&mut self, layer: HistogramLayer);

    fn legend(&mut self, legend: Legend);

    fn set_equal_aspect(&mut self);

    fn set_limits(&mut self, x: Option<(f32, f32)>, y: Option<(f32, f32)>);
}

/// A coordinate system inside a [`Figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub layers: Vec<Layer>,
    pub legend: Option<Legend>,
    pub equal_aspect: bool,
    pub x_limits: Option<(f32, f32)>,
    pub y_limits: Option<(f32, f32)>,
    /// Fraction of the figure height this axes occupies
    pub height_share: f32,
}

impl Axes {
    fn new(height_share: f32) -> Self {
        Self {
            layers: Vec::new(),
            legend: None,
            equal_aspect: false,
            x_limits: None,
            y_limits: None,
            height_share,
        }
    }

    /// Finite (x, y) extent across polyline and scatter layers.
    pub fn data_bounds(&self) -> Option<((f32, f32), (f32, f32))> {
        let mut bounds: Option<((f32, f32), (f32, f32))> = None;
        for layer in &self.layers {
            let (xs, ys) = match layer {
                Layer::Polyline { xs, ys, .. } | Layer::Scatter { xs, ys, .. } => (xs, ys),
                Layer::Histogram(_) => continue,
            };
            for (&x, &y) in xs.iter().zip(ys) {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => ((x, x), (y, y)),
                    Some(((x0, x1), (y0, y1))) => {
                        ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
                    }
                });
            }
        }
        bounds
    }
}

impl PlotSurface for Axes {
    fn polyline(&mut self, xs: &[f32], ys: &[f32], style: LineStyle) {
        self.layers.push(Layer::Polyline {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            style,
        });
    }

    fn scatter(&mut self, xs: &[f32], ys: &[f32], colors: &[Rgb], marker_size: f32) {
        self.layers.push(Layer::Scatter {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            colors: colors.to_vec(),
            marker_size,
        });
    }

    fn histogram(&mut self, layer: HistogramLayer) {
        self.layers.push(Layer::Histogram(layer));
    }

    fn legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    fn set_equal_aspect(&mut self) {
        self.equal_aspect = true;
    }

    fn set_limits(&mut self, x: Option<(f32, f32)>, y: Option<(f32, f32)>) {
        self.x_limits = x;
        self.y_limits = y;
    }
}

/// A figure of fixed pixel size holding vertically stacked axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    axes: Vec<Axes>,
}

impl Figure {
    pub fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            axes: Vec::new(),
        }
    }

    /// Append an axes below the existing ones and return it.
    pub fn add_axes(&mut self, height_share: f32) -> &mut Axes {
        self.axes.push(Axes::new(height_share));
        let last = self.axes.len() - 1;
        &mut self.axes[last]
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self, index: usize) -> Option<&mut Axes> {
        self.axes.get_mut(index)
    }

    /// All layers across all axes in draw order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.axes.iter().flat_map(|a| a.layers.iter())
    }

    pub fn polyline_count(&self) -> usize {
        self.layers()
            .filter(|l| matches!(l, Layer::Polyline { .. }))
            .count()
    }

    pub fn scatter_count(&self) -> usize {
        self.layers()
            .filter(|l| matches!(l, Layer::Scatter { .. }))
            .count()
    }

    pub fn histogram_count(&self) -> usize {
        self.layers()
            .filter(|l| matches!(l, Layer::Histogram(_)))
            .count()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.axes.iter().find_map(|a| a.legend.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hist(values: Vec<f32>, normalization: Normalization) -> HistogramLayer {
        HistogramLayer {
            values,
            bins: 4,
            range: (0.0, 1.0),
            normalization,
            color: Rgb::BLACK,
        }
    }

    #[test]
    fn density_integrates_to_one() {
        let layer = hist(vec![0.1, 0.3, 0.3, 0.9, 1.0], Normalization::Density);
        let heights = layer.heights();
        let area: f32 = heights.iter().map(|h| h * 0.25).sum();
        assert!((area - 1.0).abs() < 1e-6, "area was {}", area);
    }

    #[test]
    fn upper_edge_lands_in_last_bin() {
        let layer = hist(vec![0.0, 1.0, 1.0], Normalization::Count);
        assert_eq!(layer.heights(), vec![1.0, 0.0, 0.0, 2.0]);
        assert_eq!(layer.bin_edges(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn empty_density_is_zero() {
        let layer = hist(vec![], Normalization::Density);
        assert_eq!(layer.heights(), vec![0.0; 4]);
    }

    #[test]
    fn axes_records_in_order() {
        let mut figure = Figure::new((100, 100));
        let axes = figure.add_axes(1.0);
        let style = LineStyle {
            color: Rgb::GRAY,
            width: 1.0,
            alpha: 1.0,
        };
        axes.polyline(&[0.0, 1.0, f32::NAN], &[0.0, 1.0, f32::NAN], style);
        axes.scatter(&[0.5], &[0.5], &[Rgb::BLACK], 3.0);
        axes.set_equal_aspect();

        assert_eq!(figure.polyline_count(), 1);
        assert_eq!(figure.scatter_count(), 1);
        assert_eq!(figure.histogram_count(), 0);
        assert!(figure.axes()[0].equal_aspect);
        assert!(matches!(
            figure.layers().next(),
            Some(Layer::Polyline { .. })
        ));
    }

    #[test]
    fn data_bounds_skip_gaps() {
        let mut figure = Figure::new((10, 10));
        let axes = figure.add_axes(1.0);
        axes.scatter(&[-1.0, 2.0], &[3.0, f32::NAN], &[Rgb::BLACK; 2], 1.0);
        assert_eq!(axes.data_bounds(), Some(((-1.0, -1.0), (3.0, 3.0))));
    }
}
