//! Least-squares regression calibration.
//!
//! Fits a multivariate linear model `target ≈ Wᵀ·f + b` from per-record
//! feature vectors `f` (see [`FeatureExtractor`]) to the known target points.
//!
//! # Algorithm
//!
//! 1. Build the design matrix `X` (n×d) and target matrix `Y` (n×2)
//! 2. Centre both by their column means `x̄`, `ȳ`
//! 3. Solve `X_c W = Y_c` with an SVD pseudo-inverse (minimum-norm solution)
//! 4. Recover the intercept `b = ȳ − Wᵀ x̄`
//!
//! Centring keeps the intercept out of the solve, so constant feature columns
//! (the homogeneous row of a transform, for instance) are simply assigned a
//! zero coefficient instead of making the system singular.

use std::fmt;

use gaze_calib_core::{
    CalibError, CalibrationRecord, FeatureExtractor, Pt2, Real, Vec2, ensure_input,
    validate_records,
};
use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::{
    Calibrator,
    math::{center_columns, column_means, lstsq_min_norm},
};

/// Fitted linear model: `prediction = coefficientsᵀ · features + intercept`.
///
/// This is the in-memory shape a caller would persist if it wants to keep a
/// fitted model around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// `d × 2` coefficient matrix, one column per screen coordinate.
    pub coefficients: DMatrix<Real>,
    /// Per-coordinate intercept.
    pub intercept: Vec2,
}

impl LinearModel {
    /// Ordinary least squares with intercept.
    ///
    /// `x` is the `n × d` design matrix, `y` the `n × 2` targets.
    ///
    /// # Errors
    ///
    /// - [`CalibError::InvalidInput`] if `x` is empty or the shapes disagree.
    /// - [`CalibError::Numerical`] if the system holds non-finite values or the
    ///   solve does not produce a finite model.
    pub fn fit(x: &DMatrix<Real>, y: &DMatrix<Real>) -> Result<Self, CalibError> {
        ensure_input!(x.nrows() > 0, "need at least one sample");
        ensure_input!(x.ncols() > 0, "need at least one feature");
        ensure_input!(
            y.ncols() == 2,
            "targets must have 2 columns, got {}",
            y.ncols()
        );
        ensure_input!(
            x.nrows() == y.nrows(),
            "mismatched number of feature rows ({}) and target rows ({})",
            x.nrows(),
            y.nrows()
        );

        let x_mean = column_means(x);
        let y_mean = column_means(y);
        let xc = center_columns(x, &x_mean);
        let yc = center_columns(y, &y_mean);

        let coefficients = lstsq_min_norm(&xc, &yc)?;
        let proj = coefficients.tr_mul(&x_mean);
        let intercept = Vec2::new(y_mean[0] - proj[0], y_mean[1] - proj[1]);

        if !intercept.iter().all(|v| v.is_finite()) {
            return Err(CalibError::Numerical("intercept is not finite".to_string()));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Number of features the model expects.
    pub fn num_features(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Predict a screen point from a feature vector.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if `features` has the wrong length.
    pub fn predict(&self, features: &DVector<Real>) -> Result<Pt2, CalibError> {
        ensure_input!(
            features.len() == self.num_features(),
            "expected {} features, got {}",
            self.num_features(),
            features.len()
        );
        let p = self.coefficients.tr_mul(features);
        Ok(Pt2::new(p[0] + self.intercept.x, p[1] + self.intercept.y))
    }
}

/// Regression calibrator with a pluggable feature extractor.
///
/// # Example
///
/// ```
/// use gaze_calib_core::{CalibrationRecord, FeatureExtractor, FeatureSet, Pt2};
/// use gaze_calib_linear::RegressionCalibrator;
///
/// // targets are the gaze points shifted by (-4, 2)
/// let records: Vec<CalibrationRecord> = (0..6)
///     .map(|i| {
///         let gaze = Pt2::new(10.0 * i as f64, 7.0 * (i * i) as f64);
///         let target = Pt2::new(gaze.x - 4.0, gaze.y + 2.0);
///         CalibrationRecord::builder(target, gaze).build().unwrap()
///     })
///     .collect();
///
/// let calib = RegressionCalibrator::fit(&records, FeatureSet::Gaze).unwrap();
/// let features = FeatureSet::Gaze.extract(&records[3]);
/// let p = calib.calibrate(&features).unwrap();
/// assert!((p - records[3].target_point).norm() < 1e-9);
/// ```
#[derive(Clone)]
pub struct RegressionCalibrator<E> {
    extractor: E,
    model: LinearModel,
}

impl<E: FeatureExtractor> RegressionCalibrator<E> {
    /// Fit the model on `records` using `extractor` for the features.
    ///
    /// # Errors
    ///
    /// - [`CalibError::InvalidInput`] if `records` is empty or malformed, or
    ///   the extractor returns vectors of differing (or zero) length.
    /// - [`CalibError::Numerical`] if the solve fails.
    pub fn fit(records: &[CalibrationRecord], extractor: E) -> Result<Self, CalibError> {
        validate_records(records)?;
        let (x, y) = design_matrices(records, &extractor)?;
        let model = LinearModel::fit(&x, &y)?;
        debug!(
            "regression calibrator: {} records, {} features",
            records.len(),
            model.num_features()
        );
        Ok(Self { extractor, model })
    }

    /// Predict the target point for a feature vector built the same way as
    /// the training features.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if `features` has the wrong length.
    pub fn calibrate(&self, features: &DVector<Real>) -> Result<Pt2, CalibError> {
        self.model.predict(features)
    }

    /// The fitted model.
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// The feature extractor used for training and evaluation.
    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

impl<E: FeatureExtractor> Calibrator for RegressionCalibrator<E> {
    fn calibrate_record(&self, record: &CalibrationRecord) -> Result<Pt2, CalibError> {
        self.model.predict(&self.extractor.extract(record))
    }
}

impl<E> fmt::Debug for RegressionCalibrator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegressionCalibrator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Stack per-record features and targets into `(X, Y)`.
///
/// The first record fixes the feature length; every other record must match.
pub fn design_matrices<E: FeatureExtractor + ?Sized>(
    records: &[CalibrationRecord],
    extractor: &E,
) -> Result<(DMatrix<Real>, DMatrix<Real>), CalibError> {
    ensure_input!(!records.is_empty(), "need at least one calibration record");

    let features: Vec<DVector<Real>> = records.iter().map(|r| extractor.extract(r)).collect();
    let dim = features[0].len();
    ensure_input!(dim > 0, "feature extractor returned an empty vector");

    let mut x = DMatrix::<Real>::zeros(records.len(), dim);
    let mut y = DMatrix::<Real>::zeros(records.len(), 2);
    for (i, (f, r)) in features.iter().zip(records).enumerate() {
        ensure_input!(
            f.len() == dim,
            "record {} has {} features, expected {}",
            i,
            f.len(),
            dim
        );
        x.row_mut(i).tr_copy_from(f);
        y[(i, 0)] = r.target_point.x;
        y[(i, 1)] = r.target_point.y;
    }
    Ok((x, y))
}
