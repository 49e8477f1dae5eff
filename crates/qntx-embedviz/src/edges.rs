//! Edge partitioning and polyline geometry for the graph overlay.
//!
//! Edges are split into one intra-cluster group per label (ascending label
//! order, which fixes draw and z-order) and a single inter-cluster group
//! drawn last. Each group flattens into one NaN-separated polyline so a
//! dense graph costs one draw call per group rather than one per edge.

use crate::adjacency::Edge;
use crate::labels::LabelVector;
use crate::palette::{EdgeColor, Palette, Rgb};
use crate::points::PointMatrix;

/// Which edges a group holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Both endpoints carry this normalized label
    Intra(usize),
    /// Endpoint labels differ
    Inter,
}

/// Edges selected by one predicate. Transient, rebuilt per render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    pub kind: GroupKind,
    pub edges: Vec<Edge>,
}

impl EdgeGroup {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Styling inputs for [`EdgeBatcher::batches`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub intra_color: EdgeColor,
    pub inter_color: EdgeColor,
    pub intra_width: f32,
    pub inter_width: f32,
    pub alpha: f32,
}

/// A ready-to-draw polyline for one non-empty edge group.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeBatch {
    pub kind: GroupKind,
    /// Length 3m: `[x_a, x_b, NaN]` per edge
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub color: Rgb,
    pub width: f32,
    pub alpha: f32,
}

impl EdgeBatch {
    pub fn n_edges(&self) -> usize {
        self.xs.len() / 3
    }
}

/// Partitions an edge list by cluster membership.
pub struct EdgeBatcher<'a> {
    edges: &'a [Edge],
    labels: &'a LabelVector,
}

impl<'a> EdgeBatcher<'a> {
    /// `edges` must index into `labels`; callers validate counts first.
    pub fn new(edges: &'a [Edge], labels: &'a LabelVector) -> Self {
        Self { edges, labels }
    }

    /// Edges whose endpoints both carry `label`.
    pub fn intra(&self, label: usize) -> Vec<Edge> {
        self.select(|a, b| a == label && b == label)
    }

    /// Edges whose endpoint labels differ.
    pub fn inter(&self) -> Vec<Edge> {
        self.select(|a, b| a != b)
    }

    fn select(&self, keep: impl Fn(usize, usize) -> bool) -> Vec<Edge> {
        self.edges
            .iter()
            .copied()
            .filter(|&(i, j)| keep(self.labels.get(i), self.labels.get(j)))
            .collect()
    }

    /// All groups in draw order: intra groups by ascending label, then inter.
    /// Groups may be empty.
    pub fn groups(&self) -> Vec<EdgeGroup> {
        let clusters = self.labels.distinct();
        let mut intra = vec![Vec::new(); clusters.len()];
        let mut inter = Vec::new();

        for &(i, j) in self.edges {
            let (a, b) = (self.labels.get(i), self.labels.get(j));
            if a != b {
                inter.push((i, j));
            } else if let Ok(slot) = clusters.binary_search(&a) {
                intra[slot].push((i, j));
            }
        }

        clusters
            .into_iter()
            .zip(intra)
            .map(|(label, edges)| EdgeGroup {
                kind: GroupKind::Intra(label),
                edges,
            })
            .chain(std::iter::once(EdgeGroup {
                kind: GroupKind::Inter,
                edges: inter,
            }))
            .collect()
    }

    /// Flattened, styled polylines for every non-empty group, in draw order.
    pub fn batches(
        &self,
        points: &PointMatrix,
        style: &EdgeStyle,
        palette: &Palette,
    ) -> Vec<EdgeBatch> {
        self.groups()
            .into_iter()
            .filter(|g| !g.is_empty())
            .map(|group| {
                let (color, width) = match group.kind {
                    GroupKind::Intra(label) => (
                        style.intra_color.resolve(palette, Some(label)),
                        style.intra_width,
                    ),
                    GroupKind::Inter => (
                        style.inter_color.resolve(palette, None),
                        style.inter_width,
                    ),
                };
                let (xs, ys) = flatten_segments(points, &group.edges);
                EdgeBatch {
                    kind: group.kind,
                    xs,
                    ys,
                    color,
                    width,
                    alpha: style.alpha,
                }
            })
            .collect()
    }
}

/// Interleave `[a, b, NaN]` per edge into x and y sequences of length 3m.
///
/// `points` must have at least two columns; the first two are used.
pub fn flatten_segments(points: &PointMatrix, edges: &[Edge]) -> (Vec<f32>, Vec<f32>) {
    let mut xs = Vec::with_capacity(edges.len() * 3);
    let mut ys = Vec::with_capacity(edges.len() * 3);
    for &(a, b) in edges {
        let (pa, pb) = (points.row(a), points.row(b));
        xs.extend_from_slice(&[pa[0], pb[0], f32::NAN]);
        ys.extend_from_slice(&[pa[1], pb[1], f32::NAN]);
    }
    (xs, ys)
}
