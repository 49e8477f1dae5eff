//! Neighborhood recall: how much of each point's k-NN set in the original
//! space survives in the embedding.
//!
//! `recall(i) = |knn_high(i) ∩ knn_low(i)| / k`. The computation is a pure
//! function of the two point sets and `k`.

use crate::error::{Result, VizError};
use crate::knn::NeighborSearch;
use crate::points::PointMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Whether a point counts among its own neighbors.
///
/// Applied identically to both spaces. With `Include` every point is its own
/// nearest candidate, so recall is at least `1/k` (ties at distance zero
/// aside); `Exclude` drops the query before truncating to `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfMatch {
    #[default]
    Include,
    Exclude,
}

/// Check `0 < k < n`.
pub fn validate_k(k: usize, n_points: usize) -> Result<()> {
    if k == 0 || k >= n_points {
        return Err(VizError::invalid(format!(
            "k must satisfy 0 < k < n_points ({}), got {}",
            n_points, k
        )));
    }
    Ok(())
}

/// k-NN index sets of `points` against itself, nearest first.
pub fn neighbor_sets<S: NeighborSearch + ?Sized>(
    search: &S,
    points: &PointMatrix,
    k: usize,
    self_match: SelfMatch,
) -> Result<Vec<Vec<usize>>> {
    validate_k(k, points.n_points())?;

    let indices = match self_match {
        SelfMatch::Include => search.kneighbors(points, points, k)?.indices,
        SelfMatch::Exclude => search
            .kneighbors(points, points, k + 1)?
            .indices
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                match row.iter().position(|&j| j == i) {
                    Some(pos) => {
                        row.remove(pos);
                    }
                    None => row.truncate(k),
                }
                row
            })
            .collect(),
    };

    if indices.len() != points.n_points() {
        return Err(VizError::Search(format!(
            "search returned {} rows for {} points",
            indices.len(),
            points.n_points()
        )));
    }
    for (i, row) in indices.iter().enumerate() {
        if row.len() != k {
            return Err(VizError::Search(format!(
                "search returned {} neighbors for point {}, expected {}",
                row.len(),
                i,
                k
            )));
        }
        let mut seen = HashSet::with_capacity(k);
        if let Some(&j) = row
            .iter()
            .find(|&&j| j >= points.n_points() || !seen.insert(j))
        {
            return Err(VizError::Search(format!(
                "search returned repeated or out-of-range neighbor {} for point {}",
                j, i
            )));
        }
    }

    Ok(indices)
}

/// Per-point recall of the high-dimensional k-NN sets in the embedding.
///
/// Fails with `ShapeMismatch` when the point counts differ and with
/// `InvalidParameter` when `k` is not in `1..n`, before any search runs.
pub fn neighbor_recall<S: NeighborSearch + ?Sized>(
    search: &S,
    high: &PointMatrix,
    low: &PointMatrix,
    k: usize,
    self_match: SelfMatch,
) -> Result<Vec<f32>> {
    if high.n_points() != low.n_points() {
        return Err(VizError::shape(
            "embedding points",
            high.n_points(),
            low.n_points(),
        ));
    }
    validate_k(k, high.n_points())?;

    let start = Instant::now();
    let high_sets = neighbor_sets(search, high, k, self_match)?;
    let low_sets = neighbor_sets(search, low, k, self_match)?;

    let recall: Vec<f32> = high_sets
        .iter()
        .zip(&low_sets)
        .map(|(h, l)| overlap(h, l) as f32 / k as f32)
        .collect();

    let elapsed_ms = start.elapsed().as_millis() as u64;
    if let Some(summary) = RecallSummary::from_values(&recall) {
        info!(
            "neighbor recall complete: {} points, k={}, mean {:.3} in {}ms",
            recall.len(),
            k,
            summary.mean,
            elapsed_ms
        );
    }
    debug!("self match convention: {:?}", self_match);

    Ok(recall)
}

fn overlap(a: &[usize], b: &[usize]) -> usize {
    let a: HashSet<usize> = a.iter().copied().collect();
    let b: HashSet<usize> = b.iter().copied().collect();
    a.intersection(&b).count()
}

/// Summary statistics of a recall distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecallSummary {
    pub mean: f32,
    pub median: f32,
    pub min: f32,
    pub max: f32,
}

impl RecallSummary {
    /// `None` for an empty sequence.
    pub fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Some(Self {
            mean: sorted.iter().sum::<f32>() / n as f32,
            median,
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}
