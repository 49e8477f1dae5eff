//! Cluster label normalization.
//!
//! Caller labels need not start at zero or be contiguous. Normalization
//! subtracts the minimum into a fresh vector and never touches the input.

use crate::error::{Result, VizError};

/// Cluster memberships shifted so the smallest label is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVector {
    labels: Vec<usize>,
    offset: i64,
}

impl LabelVector {
    /// Normalize caller labels into a new vector.
    ///
    /// Any `i64` labels are accepted; fails only when a shifted label does
    /// not fit in `usize` on this target.
    pub fn normalize(raw: &[i64]) -> Result<Self> {
        let offset = raw.iter().copied().min().unwrap_or(0);
        let labels = raw
            .iter()
            .map(|&l| {
                usize::try_from(l.abs_diff(offset)).map_err(|_| {
                    VizError::invalid(format!("label {} too far from minimum {}", l, offset))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { labels, offset })
    }

    /// Every point in one cluster (label 0).
    pub fn single_cluster(n_points: usize) -> Self {
        Self {
            labels: vec![0; n_points],
            offset: 0,
        }
    }

    /// Normalize `raw` if given, otherwise fall back to a single cluster.
    /// Fails when the label count disagrees with `n_points`.
    pub fn resolve(raw: Option<&[i64]>, n_points: usize) -> Result<Self> {
        match raw {
            Some(raw) if raw.len() != n_points => {
                Err(VizError::shape("labels", n_points, raw.len()))
            }
            Some(raw) => Self::normalize(raw),
            None => Ok(Self::single_cluster(n_points)),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, i: usize) -> usize {
        self.labels[i]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    /// Distinct normalized labels in ascending order.
    pub fn distinct(&self) -> Vec<usize> {
        let mut set = self.labels.clone();
        set.sort_unstable();
        set.dedup();
        set
    }

    /// Size of the label range (max + 1), used to size palettes.
    pub fn range(&self) -> usize {
        self.labels.iter().max().map_or(1, |&m| m.saturating_add(1))
    }

    /// The caller's label value for a normalized label.
    pub fn original(&self, label: usize) -> i64 {
        self.offset.wrapping_add_unsigned(label as u64)
    }
}
