//! Public entry points: embedding scatter/edge rendering and the neighbor
//! recall diagnostic.
//!
//! All validation happens before the first draw call; a failed call leaves
//! no partially drawn figure behind.

use crate::adjacency::Adjacency;
use crate::edges::EdgeBatcher;
use crate::error::{Result, VizError};
use crate::figure::{
    Figure, HistogramLayer, Legend, LegendEntry, LineStyle, Marker, Normalization, PlotSurface,
};
use crate::knn::{ExactSearch, NeighborSearch};
use crate::labels::LabelVector;
use crate::options::{EmbeddingStyle, RecallStyle};
use crate::palette::{default_palette, Rgb};
use crate::points::PointMatrix;
use crate::recall::neighbor_recall;
use tracing::{debug, info};

/// Share of the figure height given to the legend strip.
const LEGEND_SHARE: f32 = 0.1;

/// Render a 2D embedding as a scatter plot with an optional edge overlay.
///
/// `labels` default to a single cluster; `adjacency` absent means scatter
/// only. With more than one cluster the figure gets a second, stacked axes
/// holding the legend.
pub fn render_embedding(
    points: &PointMatrix,
    labels: Option<&[i64]>,
    adjacency: Option<&Adjacency>,
    style: &EmbeddingStyle,
) -> Result<Figure> {
    let mut figure = Figure::new(style.resolution);
    let legend = render_embedding_on(figure.add_axes(1.0), points, labels, adjacency, style)?;

    if let Some(legend) = legend {
        if let Some(main) = figure.axes_mut(0) {
            main.height_share = 1.0 - LEGEND_SHARE;
        }
        figure.add_axes(LEGEND_SHARE).legend(legend);
    }

    Ok(figure)
}

/// Draw edges and points onto `surface`.
///
/// Returns the legend for the caller to place when there is more than one
/// cluster.
pub fn render_embedding_on<S: PlotSurface + ?Sized>(
    surface: &mut S,
    points: &PointMatrix,
    labels: Option<&[i64]>,
    adjacency: Option<&Adjacency>,
    style: &EmbeddingStyle,
) -> Result<Option<Legend>> {
    style.validate()?;
    points.expect_dims("embedding dimension", 2)?;
    let n_points = points.n_points();
    let labels = LabelVector::resolve(labels, n_points)?;
    if let Some(adj) = adjacency {
        if adj.n_points() != n_points {
            return Err(VizError::shape("adjacency matrix", n_points, adj.n_points()));
        }
    }

    let clusters = labels.distinct();
    let palette = default_palette(&labels, style.color_map);

    let mut n_batches = 0;
    if let Some(adj) = adjacency {
        let batches = EdgeBatcher::new(adj.edges(), &labels).batches(
            points,
            &style.edge_style(),
            &palette,
        );
        for batch in &batches {
            debug!("edge batch {:?}: {} edges", batch.kind, batch.n_edges());
            surface.polyline(
                &batch.xs,
                &batch.ys,
                LineStyle {
                    color: batch.color,
                    width: batch.width,
                    alpha: batch.alpha,
                },
            );
        }
        n_batches = batches.len();
    }

    let point_color = |label: usize| {
        style
            .point_color
            .or_else(|| palette.color(label))
            .unwrap_or(Rgb::BLACK)
    };
    let colors: Vec<_> = labels.as_slice().iter().map(|&l| point_color(l)).collect();
    surface.scatter(&points.column(0), &points.column(1), &colors, style.marker_size);
    surface.set_equal_aspect();

    info!(
        "embedding rendered: {} points, {} clusters, {} edges in {} batches",
        n_points,
        clusters.len(),
        adjacency.map_or(0, Adjacency::n_edges),
        n_batches
    );

    if clusters.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(Legend {
        entries: clusters
            .iter()
            .map(|&l| LegendEntry {
                marker: Marker::Circle,
                color: point_color(l),
                label: labels.original(l).to_string(),
            })
            .collect(),
        orientation: style.legend_orientation,
        label_size: style.legend_label_size,
    }))
}

/// Per-point neighbor recall between `high` and its embedding `low`, with a
/// density histogram over [0, 1]. Uses exact brute-force search.
pub fn compute_neighbor_recall(
    high: &PointMatrix,
    low: &PointMatrix,
    style: &RecallStyle,
) -> Result<(Vec<f32>, Figure)> {
    compute_neighbor_recall_with(&ExactSearch::new(), high, low, style)
}

/// [`compute_neighbor_recall`] with a caller-supplied search backend.
pub fn compute_neighbor_recall_with<S: NeighborSearch + ?Sized>(
    search: &S,
    high: &PointMatrix,
    low: &PointMatrix,
    style: &RecallStyle,
) -> Result<(Vec<f32>, Figure)> {
    style.validate()?;
    let recall = neighbor_recall(search, high, low, style.k, style.self_match)?;

    let mut figure = Figure::new(style.resolution);
    let axes = figure.add_axes(1.0);
    axes.histogram(HistogramLayer {
        values: recall.clone(),
        bins: style.bins,
        range: (0.0, 1.0),
        normalization: Normalization::Density,
        color: style.color,
    });
    axes.set_limits(Some((0.0, 1.0)), None);

    Ok((recall, figure))
}
