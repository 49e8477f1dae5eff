//! Row-major point matrices shared by both pipelines.
//!
//! Row index is the point's identity; it must line up with labels,
//! adjacency rows and the high-dimensional data.

use crate::error::{Result, VizError};

/// An n×d matrix of finite `f32` coordinates, stored flat in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMatrix {
    data: Vec<f32>,
    n_points: usize,
    dims: usize,
}

impl PointMatrix {
    /// Build from a flat array of `n_points * dims` values.
    pub fn from_flat(data: Vec<f32>, n_points: usize, dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(VizError::invalid("point dimension must be at least 1"));
        }
        if data.len() != n_points * dims {
            return Err(VizError::shape("flat point data", n_points * dims, data.len()));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(VizError::invalid(format!(
                "non-finite coordinate at row {}, column {}",
                pos / dims,
                pos % dims
            )));
        }

        Ok(Self {
            data,
            n_points,
            dims,
        })
    }

    /// Build from fixed-width rows.
    pub fn from_rows<const D: usize>(rows: &[[f32; D]]) -> Result<Self> {
        let data = rows.iter().flatten().copied().collect();
        Self::from_flat(data, rows.len(), D)
    }

    /// Build from variable-length rows; every row must have the same length.
    pub fn from_vecs(rows: &[Vec<f32>]) -> Result<Self> {
        let dims = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * dims);
        for row in rows {
            if row.len() != dims {
                return Err(VizError::shape("row dimension", dims, row.len()));
            }
            data.extend_from_slice(row);
        }
        Self::from_flat(data, rows.len(), dims)
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }

    /// Copy of column `j` across all rows.
    pub fn column(&self, j: usize) -> Vec<f32> {
        self.data.iter().skip(j).step_by(self.dims).copied().collect()
    }

    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Fail unless this matrix has exactly `dims` columns.
    pub(crate) fn expect_dims(&self, what: &'static str, dims: usize) -> Result<()> {
        if self.dims != dims {
            return Err(VizError::shape(what, dims, self.dims));
        }
        Ok(())
    }
}

/// Squared Euclidean distance between two equal-length slices.
#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
