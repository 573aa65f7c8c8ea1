//! Numeric reductions shared by the calibrators.
//!
//! - **Offset means**: plain and weighted averages of `gaze − target`.
//! - **Least squares**: an SVD pseudo-inverse solve returning the minimum-norm
//!   solution, so rank-deficient designs (constant feature columns,
//!   duplicated features) still produce a well-defined model.
//!
//! # Example
//!
//! ```
//! use gaze_calib_linear::math::lstsq_min_norm;
//! use nalgebra::DMatrix;
//!
//! // two identical columns: the least-norm solution splits the weight evenly
//! let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
//! let b = DMatrix::from_row_slice(3, 1, &[2.0, 4.0, 6.0]);
//! let x = lstsq_min_norm(&a, &b).unwrap();
//! assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
//! assert!((x[(1, 0)] - 1.0).abs() < 1e-12);
//! ```

use gaze_calib_core::{CalibError, CalibrationRecord, Real, Vec2};
use nalgebra::{DMatrix, DVector};

/// Arithmetic mean of `gaze − target` over `records`.
///
/// Returns `None` for an empty slice.
pub fn mean_offset(records: &[CalibrationRecord]) -> Option<Vec2> {
    if records.is_empty() {
        return None;
    }
    let sum = records
        .iter()
        .fold(Vec2::zeros(), |acc, r| acc + r.offset());
    Some(sum / records.len() as Real)
}

/// Weighted mean `Σ offset_i·w_i / Σ w_i` and the total weight `Σ w_i`.
///
/// A total weight of exactly zero yields the zero vector. `weights` must have
/// one entry per record.
pub fn weighted_mean_offset(records: &[CalibrationRecord], weights: &[Real]) -> (Vec2, Real) {
    debug_assert_eq!(records.len(), weights.len());

    let mut weighted_sum = Vec2::zeros();
    let mut total_weight = 0.0;
    for (r, &w) in records.iter().zip(weights) {
        weighted_sum += r.offset() * w;
        total_weight += w;
    }

    if total_weight == 0.0 {
        (Vec2::zeros(), 0.0)
    } else {
        (weighted_sum / total_weight, total_weight)
    }
}

/// Per-column means of `m`.
pub fn column_means(m: &DMatrix<Real>) -> DVector<Real> {
    DVector::from_iterator(m.ncols(), m.column_iter().map(|c| c.mean()))
}

/// Subtract `means[j]` from every entry of column `j`.
pub fn center_columns(m: &DMatrix<Real>, means: &DVector<Real>) -> DMatrix<Real> {
    let mut out = m.clone();
    for (mut col, &mean) in out.column_iter_mut().zip(means.iter()) {
        col.add_scalar_mut(-mean);
    }
    out
}

/// Minimum-norm least-squares solution of `A X = B`.
///
/// Singular values below `σ_max · max(rows, cols) · ε` are treated as zero,
/// matching the usual LAPACK `gelsd` cut-off.
///
/// # Errors
///
/// [`CalibError::Numerical`] if either matrix holds non-finite values, the
/// SVD cannot be solved, or the solution is not finite.
pub fn lstsq_min_norm(a: &DMatrix<Real>, b: &DMatrix<Real>) -> Result<DMatrix<Real>, CalibError> {
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(CalibError::Numerical(
            "least-squares system contains non-finite values".to_string(),
        ));
    }

    let dim = a.nrows().max(a.ncols()) as Real;
    let svd = a.clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0, Real::max);
    let eps = sigma_max * dim * Real::EPSILON;

    let x = svd
        .solve(b, eps)
        .map_err(|e| CalibError::Numerical(format!("svd solve failed: {e}")))?;

    if x.iter().any(|v| !v.is_finite()) {
        return Err(CalibError::Numerical(
            "least-squares solution is not finite".to_string(),
        ));
    }
    Ok(x)
}
