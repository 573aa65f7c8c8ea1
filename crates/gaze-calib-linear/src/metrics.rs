//! Accuracy metrics for calibrated predictions.

use gaze_calib_core::{CalibError, Pt2, Real};
use serde::{Deserialize, Serialize};

/// Prediction accuracy over a set of records, in screen units.
///
/// `r2` is the uniform average of the per-coordinate coefficients of
/// determination `1 − SS_res / SS_tot`. When a coordinate of the true targets
/// has zero variance (every target shares that coordinate) the value is NaN;
/// callers must handle that case. In serialized form a NaN `r2` is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean of squared per-coordinate residuals.
    pub mse: Real,
    /// `sqrt(mse)`.
    pub rmse: Real,
    /// Coefficient of determination.
    #[serde(with = "nan_as_null")]
    pub r2: Real,
    /// Mean Euclidean distance between prediction and target.
    pub mean_euclidean_error: Real,
}

impl AccuracyMetrics {
    /// Score `predicted` against `actual`.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if the slices are empty or differ in length.
    pub fn from_points(predicted: &[Pt2], actual: &[Pt2]) -> Result<Self, CalibError> {
        gaze_calib_core::ensure_input!(!actual.is_empty(), "cannot score an empty set");
        gaze_calib_core::ensure_input!(
            predicted.len() == actual.len(),
            "mismatched number of predictions ({}) and targets ({})",
            predicted.len(),
            actual.len()
        );

        let n = actual.len() as Real;
        let mean = actual.iter().fold(Pt2::origin().coords, |acc, p| acc + p.coords) / n;

        let mut ss_res = [0.0; 2];
        let mut ss_tot = [0.0; 2];
        let mut dist_sum = 0.0;
        for (p, a) in predicted.iter().zip(actual) {
            let r = p - a;
            dist_sum += r.norm();
            for c in 0..2 {
                ss_res[c] += r[c] * r[c];
                let d = a[c] - mean[c];
                ss_tot[c] += d * d;
            }
        }

        let mse = (ss_res[0] + ss_res[1]) / (2.0 * n);
        let r2_axis = |c: usize| {
            if ss_tot[c] == 0.0 {
                Real::NAN
            } else {
                1.0 - ss_res[c] / ss_tot[c]
            }
        };

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            r2: 0.5 * (r2_axis(0) + r2_axis(1)),
            mean_euclidean_error: dist_sum / n,
        })
    }
}

/// Maps NaN to `null` and back, since JSON has no NaN literal.
mod nan_as_null {
    use gaze_calib_core::Real;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Real, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Real, D::Error> {
        Ok(Option::<Real>::deserialize(deserializer)?.unwrap_or(Real::NAN))
    }
}
