//! Exact k-nearest-neighbor search.
//!
//! [`NeighborSearch`] is the seam for the search collaborator; the recall
//! estimator only depends on the trait. [`ExactSearch`] is a brute-force
//! Euclidean implementation: every query scans every reference point.

use crate::error::{Result, VizError};
use crate::points::{squared_euclidean, PointMatrix};
use std::cmp::Ordering;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Neighbors per query, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnResult {
    pub indices: Vec<Vec<usize>>,
    pub distances: Vec<Vec<f32>>,
}

/// Contract for k-NN search backends.
pub trait NeighborSearch {
    /// For each row of `queries`, the `k` nearest rows of `reference` sorted
    /// by ascending distance. When `reference` and `queries` are the same
    /// set, each query is a candidate neighbor of itself.
    fn kneighbors(
        &self,
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> Result<KnnResult>;
}

/// Brute-force Euclidean search. Ties are broken by ascending index.
#[derive(Debug, Clone)]
pub struct ExactSearch {
    /// Query count at which the `parallel` feature switches to rayon
    pub parallel_threshold: usize,
}

impl Default for ExactSearch {
    fn default() -> Self {
        Self {
            parallel_threshold: 512,
        }
    }
}

impl ExactSearch {
    pub fn new() -> Self {
        Self::default()
    }

    fn query_one(reference: &PointMatrix, query: &[f32], k: usize) -> (Vec<usize>, Vec<f32>) {
        let mut candidates: Vec<(f32, usize)> = (0..reference.n_points())
            .map(|j| (squared_euclidean(query, reference.row(j)), j))
            .collect();

        let by_distance = |a: &(f32, usize), b: &(f32, usize)| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        };

        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, by_distance);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(by_distance);

        candidates
            .into_iter()
            .map(|(d2, j)| (j, d2.sqrt()))
            .unzip()
    }

    #[cfg(feature = "parallel")]
    fn run(
        &self,
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> Vec<(Vec<usize>, Vec<f32>)> {
        if queries.n_points() >= self.parallel_threshold {
            (0..queries.n_points())
                .into_par_iter()
                .map(|i| Self::query_one(reference, queries.row(i), k))
                .collect()
        } else {
            Self::run_sequential(reference, queries, k)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run(
        &self,
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> Vec<(Vec<usize>, Vec<f32>)> {
        Self::run_sequential(reference, queries, k)
    }

    fn run_sequential(
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> Vec<(Vec<usize>, Vec<f32>)> {
        (0..queries.n_points())
            .map(|i| Self::query_one(reference, queries.row(i), k))
            .collect()
    }
}

impl NeighborSearch for ExactSearch {
    fn kneighbors(
        &self,
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> Result<KnnResult> {
        queries.expect_dims("query dimension", reference.dims())?;
        if k == 0 || k > reference.n_points() {
            return Err(VizError::invalid(format!(
                "k must be in 1..={}, got {}",
                reference.n_points(),
                k
            )));
        }

        debug!(
            "exact k-NN: {} queries x {} reference points (dims={}, k={})",
            queries.n_points(),
            reference.n_points(),
            reference.dims(),
            k
        );

        let (indices, distances) = self.run(reference, queries, k).into_iter().unzip();
        Ok(KnnResult { indices, distances })
    }
}
