//! QNTX Embedding Diagnostics
//!
//! Quality checks for 2D embeddings produced by dimensionality reduction
//! (UMAP, t-SNE, PCA). Two independent pipelines:
//!
//! - **Embedding rendering**: a cluster-colored scatter plot with an optional
//!   graph overlay. Edges are batched into one polyline per cluster plus one
//!   for edges that cross clusters.
//! - **Neighbor recall**: per point, the fraction of its k nearest neighbors
//!   in the original space that are also among its k nearest neighbors in
//!   the embedding, plus a density histogram of the result.
//!
//! Both return an in-memory [`Figure`]. With the `svg` feature (on by
//! default) a figure can be exported with [`Figure::to_svg`].
//!
//! # Features
//!
//! - `svg` - SVG export via plotters
//! - `parallel` - Parallel exact k-NN via rayon for large point sets
//!
//! # Example
//!
//! ```rust
//! use qntx_embedviz::{
//!     compute_neighbor_recall, render_embedding, Adjacency, EmbeddingStyle, PointMatrix,
//!     RecallStyle,
//! };
//!
//! let y = PointMatrix::from_rows(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
//! let graph = Adjacency::from_edges(4, &[(0, 1), (1, 2)]).unwrap();
//! let labels = [0, 0, 1, 1];
//!
//! let figure = render_embedding(&y, Some(&labels[..]), Some(&graph), &EmbeddingStyle::default())
//!     .unwrap();
//! assert_eq!(figure.polyline_count(), 2);
//!
//! let style = RecallStyle { k: 2, ..Default::default() };
//! let (recall, _hist) = compute_neighbor_recall(&y, &y, &style).unwrap();
//! assert_eq!(recall, vec![1.0; 4]);
//! ```

pub mod adjacency;
pub mod edges;
pub mod error;
pub mod figure;
pub mod knn;
pub mod labels;
pub mod logging;
pub mod options;
pub mod palette;
pub mod points;
pub mod recall;
pub mod render;

#[cfg(feature = "svg")]
mod svg;

// Re-export main types at crate root
pub use adjacency::{Adjacency, Edge};
pub use edges::{flatten_segments, EdgeBatch, EdgeBatcher, EdgeGroup, EdgeStyle, GroupKind};
pub use error::{Result, VizError};
pub use figure::{
    Axes, Figure, HistogramLayer, Layer, Legend, LegendEntry, LineStyle, Marker, Normalization,
    Orientation, PlotSurface,
};
pub use knn::{ExactSearch, KnnResult, NeighborSearch};
pub use labels::LabelVector;
pub use options::{EmbeddingStyle, RecallStyle};
pub use palette::{default_palette, ColorMap, EdgeColor, Palette, Rgb};
pub use points::PointMatrix;
pub use recall::{neighbor_recall, neighbor_sets, validate_k, RecallSummary, SelfMatch};
pub use render::{
    compute_neighbor_recall, compute_neighbor_recall_with, render_embedding, render_embedding_on,
};
