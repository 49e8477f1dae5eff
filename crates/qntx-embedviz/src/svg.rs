//! SVG export of recorded figures through `plotters`.
//!
//! Output stays in memory. Axes are stacked top to bottom by their height
//! share; an axes without layers but with a legend becomes a legend strip.

use crate::error::{Result, VizError};
use crate::figure::{Axes, Figure, Layer, Legend, Orientation};
use crate::palette::Rgb;
use plotters::coord::Shift;
use plotters::prelude::*;

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 30;
const Y_LABEL_AREA: u32 = 40;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Range2d = ((f32, f32), (f32, f32));

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn render_err<E: std::fmt::Display>(e: E) -> VizError {
    VizError::Render(e.to_string())
}

impl Figure {
    /// Render the figure into an SVG document.
    pub fn to_svg(&self) -> Result<String> {
        let mut out = String::new();
        {
            let root = SVGBackend::with_string(&mut out, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let total: f32 = self.axes().iter().map(|a| a.height_share).sum();
            let mut breaks = Vec::new();
            let mut acc = 0.0f32;
            for axes in self.axes().iter().take(self.axes().len().saturating_sub(1)) {
                acc += axes.height_share;
                breaks.push((acc / total * self.height as f32).round() as i32);
            }
            let no_breaks: [i32; 0] = [];
            let areas = root.split_by_breakpoints(no_breaks, breaks);

            for (area, axes) in areas.iter().zip(self.axes()) {
                draw_axes(area, axes)?;
            }
            root.present().map_err(render_err)?;
        }
        Ok(out)
    }
}

fn draw_axes(area: &Area<'_>, axes: &Axes) -> Result<()> {
    if !axes.layers.is_empty() {
        let ((x0, x1), (y0, y1)) = chart_range(area, axes);
        let mut chart = ChartBuilder::on(area)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .draw()
            .map_err(render_err)?;

        for layer in &axes.layers {
            match layer {
                Layer::Polyline { xs, ys, style } => {
                    if style.width <= 0.0 {
                        continue;
                    }
                    let shape = rgb(style.color)
                        .mix(style.alpha as f64)
                        .stroke_width((style.width.ceil() as u32).max(1));
                    chart
                        .draw_series(
                            split_at_gaps(xs, ys)
                                .into_iter()
                                .map(|segment| PathElement::new(segment, shape)),
                        )
                        .map_err(render_err)?;
                }
                Layer::Scatter {
                    xs,
                    ys,
                    colors,
                    marker_size,
                } => {
                    let radius = marker_size.round().max(1.0) as u32;
                    let markers = xs
                        .iter()
                        .zip(ys)
                        .zip(colors)
                        .map(|((&x, &y), &c)| Circle::new((x, y), radius, rgb(c).filled()));
                    chart.draw_series(markers).map_err(render_err)?;
                }
                Layer::Histogram(hist) => {
                    let edges = hist.bin_edges();
                    let fill = rgb(hist.color).mix(0.8).filled();
                    chart
                        .draw_series(hist.heights().into_iter().enumerate().map(|(b, h)| {
                            Rectangle::new([(edges[b], 0.0), (edges[b + 1], h)], fill)
                        }))
                        .map_err(render_err)?;
                }
            }
        }
    }

    if let Some(legend) = &axes.legend {
        draw_legend(area, legend)?;
    }
    Ok(())
}

/// Axis ranges: explicit limits win, then histogram extents, then padded
/// data bounds (widened to equal units per pixel when requested).
fn chart_range(area: &Area<'_>, axes: &Axes) -> Range2d {
    let mut range = if let Some(hist) = axes.layers.iter().find_map(|l| match l {
        Layer::Histogram(h) => Some(h),
        _ => None,
    }) {
        let top = hist.heights().into_iter().fold(0.0f32, f32::max);
        (hist.range, (0.0, if top > 0.0 { top * 1.05 } else { 1.0 }))
    } else {
        let ((x0, x1), (y0, y1)) = axes.data_bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let r = (pad(x0, x1), pad(y0, y1));
        if axes.equal_aspect {
            equalize(area, r)
        } else {
            r
        }
    };

    if let Some(x) = axes.x_limits {
        range.0 = x;
    }
    if let Some(y) = axes.y_limits {
        range.1 = y;
    }
    range
}

fn pad(lo: f32, hi: f32) -> (f32, f32) {
    let span = hi - lo;
    if span <= 0.0 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - span * 0.05, hi + span * 0.05)
}

fn equalize(area: &Area<'_>, ((x0, x1), (y0, y1)): Range2d) -> Range2d {
    let (w, h) = area.dim_in_pixel();
    let plot_w = w.saturating_sub(2 * MARGIN + Y_LABEL_AREA).max(1) as f32;
    let plot_h = h.saturating_sub(2 * MARGIN + X_LABEL_AREA).max(1) as f32;

    let scale = ((x1 - x0) / plot_w).max((y1 - y0) / plot_h);
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let (half_w, half_h) = (scale * plot_w / 2.0, scale * plot_h / 2.0);
    ((cx - half_w, cx + half_w), (cy - half_h, cy + half_h))
}

/// Break a NaN-separated polyline into finite runs of at least two points.
fn split_at_gaps(xs: &[f32], ys: &[f32]) -> Vec<Vec<(f32, f32)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments.retain(|s| s.len() >= 2);
    segments
}

fn draw_legend(area: &Area<'_>, legend: &Legend) -> Result<()> {
    if legend.entries.is_empty() {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let size = legend.label_size.round().max(1.0) as i32;
    let radius = (size / 3).max(2);
    let slot = (w as i32 - 2 * MARGIN as i32) / legend.entries.len() as i32;

    for (i, entry) in legend.entries.iter().enumerate() {
        let i = i as i32;
        let (x, y) = match legend.orientation {
            Orientation::Horizontal => (MARGIN as i32 + i * slot.max(1), h as i32 / 2),
            Orientation::Vertical => (MARGIN as i32, MARGIN as i32 + i * (size + 6)),
        };
        area.draw(&Circle::new((x + radius, y), radius, rgb(entry.color).filled()))
            .map_err(render_err)?;
        area.draw(&Text::new(
            entry.label.clone(),
            (x + 2 * radius + 4, y - size / 2),
            ("sans-serif", size).into_font().color(&BLACK),
        ))
        .map_err(render_err)?;
    }
    Ok(())
}
