//! Feature matrix preparation
//!
//! Node and edge feature matrices are dense 2-D arrays, row-indexed by node id
//! and by edge id respectively. Before splitting they may be padded with zero
//! columns to a target width or replaced with uniform random values.

use ndarray::{concatenate, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

use crate::error::{DatasetError, Result};

/// Pad a feature matrix with zero columns up to `target_dim` columns
///
/// A matrix already at the target width is returned unchanged; a wider matrix
/// is a shape mismatch.
pub fn pad_feature_columns(features: &Array2<f64>, target_dim: usize) -> Result<Array2<f64>> {
    let current = features.ncols();
    if current > target_dim {
        return Err(DatasetError::ShapeMismatch(format!(
            "cannot pad {} feature columns down to {}",
            current, target_dim
        )));
    }
    if current == target_dim {
        return Ok(features.clone());
    }

    let padding = Array2::zeros((features.nrows(), target_dim - current));
    concatenate(Axis(1), &[features.view(), padding.view()])
        .map_err(|e| DatasetError::ShapeMismatch(format!("feature padding failed: {}", e)))
}

/// Uniform random replacement matrix in [0, 1) with the given shape
///
/// Randomness comes from the caller's generator so a fixed seed reproduces the
/// same matrix.
pub fn random_features(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
    Array2::random_using((rows, cols), Uniform::new(0.0, 1.0), rng)
}

/// Extract the weight column aligned to an interaction table
///
/// Edge ids are 1-based, so the edge feature matrix carries one leading
/// padding row: row `k + 1` holds the features of the table's `k`-th row. The
/// weight is the first feature column. Both the row count (`n_rows + 1`) and
/// the presence of at least one column are validated rather than assumed.
pub fn aligned_weight_column(edge_features: &Array2<f64>, n_rows: usize) -> Result<Vec<f64>> {
    if edge_features.ncols() == 0 {
        return Err(DatasetError::ShapeMismatch(
            "edge feature matrix has no columns to derive weights from".to_string(),
        ));
    }
    if edge_features.nrows() != n_rows + 1 {
        return Err(DatasetError::ShapeMismatch(format!(
            "edge feature matrix has {} rows, expected {} (table length {} plus one padding row)",
            edge_features.nrows(),
            n_rows + 1,
            n_rows
        )));
    }

    Ok(edge_features.column(0).iter().skip(1).copied().collect())
}
