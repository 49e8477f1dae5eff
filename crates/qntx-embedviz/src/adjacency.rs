//! Undirected graph input for the edge overlay.

use crate::error::{Result, VizError};
use sprs::{CsMat, TriMat};

/// An undirected edge `(i, j)` with `i > j`.
pub type Edge = (usize, usize);

/// A validated symmetric adjacency matrix, reduced to its edge list.
///
/// Only strictly-lower-triangular nonzeros are kept, so each undirected
/// edge appears once. Self-loops are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    n_points: usize,
    edges: Vec<Edge>,
}

impl Adjacency {
    /// Validate a sparse matrix: square and symmetric in its nonzero pattern.
    /// Explicitly stored zeros are not edges.
    pub fn from_csmat(matrix: &CsMat<f32>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(VizError::invalid(format!(
                "adjacency matrix must be square, got {}x{}",
                rows, cols
            )));
        }

        let mut edges = Vec::new();
        for (&value, (i, j)) in matrix.iter() {
            if value == 0.0 {
                continue;
            }
            let mirrored = matrix.get(j, i).copied().unwrap_or(0.0);
            if mirrored == 0.0 {
                return Err(VizError::invalid(format!(
                    "adjacency matrix is not symmetric: ({}, {}) set but ({}, {}) is not",
                    i, j, j, i
                )));
            }
            if i > j {
                edges.push((i, j));
            }
        }
        edges.sort_unstable();
        edges.dedup();

        Ok(Self {
            n_points: rows,
            edges,
        })
    }

    /// Build from undirected edge pairs in either orientation.
    pub fn from_edges(n_points: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut tri = TriMat::new((n_points, n_points));
        for &(a, b) in pairs {
            if a >= n_points || b >= n_points {
                return Err(VizError::invalid(format!(
                    "edge ({}, {}) out of range for {} points",
                    a, b, n_points
                )));
            }
            tri.add_triplet(a, b, 1.0f32);
            if a != b {
                tri.add_triplet(b, a, 1.0f32);
            }
        }
        let matrix: CsMat<f32> = tri.to_csr();
        Self::from_csmat(&matrix)
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Edges sorted by `(i, j)`, each with `i > j`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lower_triangle_only() {
        let adj = Adjacency::from_edges(4, &[(0, 1), (2, 1), (3, 2)]).unwrap();
        assert_eq!(adj.edges(), &[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(adj.n_edges(), 3);
    }

    #[test]
    fn duplicate_pairs_collapse() {
        let adj = Adjacency::from_edges(3, &[(0, 1), (1, 0), (0, 1)]).unwrap();
        assert_eq!(adj.edges(), &[(1, 0)]);
    }

    #[test]
    fn self_loops_dropped() {
        let adj = Adjacency::from_edges(2, &[(1, 1), (0, 1)]).unwrap();
        assert_eq!(adj.edges(), &[(1, 0)]);
    }

    #[test]
    fn asymmetric_rejected() {
        let mut tri = TriMat::new((3, 3));
        tri.add_triplet(0, 2, 1.0f32);
        let matrix: CsMat<f32> = tri.to_csr();
        let err = Adjacency::from_csmat(&matrix).unwrap_err();
        assert!(matches!(err, VizError::InvalidParameter(_)));
    }

    #[test]
    fn non_square_rejected() {
        let tri: TriMat<f32> = TriMat::new((2, 3));
        let matrix: CsMat<f32> = tri.to_csr();
        let err = Adjacency::from_csmat(&matrix).unwrap_err();
        assert!(err.to_string().contains("square"));
    }

    #[test]
    fn explicit_zeros_ignored() {
        let mut tri = TriMat::new((2, 2));
        tri.add_triplet(0, 1, 0.0f32);
        tri.add_triplet(1, 0, 0.0f32);
        let matrix: CsMat<f32> = tri.to_csr();
        let adj = Adjacency::from_csmat(&matrix).unwrap();
        assert_eq!(adj.n_edges(), 0);
    }

    #[test]
    fn out_of_range_edge() {
        assert!(Adjacency::from_edges(2, &[(0, 2)]).is_err());
    }
}
