//! Feature extraction for regression-based calibration.
//!
//! A [`FeatureExtractor`] maps a [`CalibrationRecord`] to a fixed-length
//! vector. The fitting code only sees the vectors, so feature sets can be
//! swapped without touching the solver. Any closure
//! `Fn(&CalibrationRecord) -> DVector<Real>` is an extractor; [`FeatureSet`]
//! provides the configurable built-in ones.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{CalibrationRecord, Mat4, Real};

/// Capability turning a record into a feature vector.
///
/// Implementations must be pure and return vectors of the same length for
/// every record; the regression estimator rejects mixed lengths.
pub trait FeatureExtractor {
    fn extract(&self, record: &CalibrationRecord) -> DVector<Real>;
}

impl<F> FeatureExtractor for F
where
    F: Fn(&CalibrationRecord) -> DVector<Real>,
{
    fn extract(&self, record: &CalibrationRecord) -> DVector<Real> {
        self(record)
    }
}

/// Built-in feature sets.
///
/// Transforms are flattened in column order (the capture layout), so
/// the 16 values of a transform appear as column 0, column 1, column 2 and
/// then the translation column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Gaze point only (2 features).
    Gaze,
    /// Gaze point + face transform (2 + 16 = 18 features).
    #[default]
    GazeFace,
    /// Gaze point + face, right eye and left eye transforms (2 + 48 = 50 features).
    GazeFaceEyes,
    /// Gaze point + roll/pitch/yaw in degrees (2 + 3 = 5 features).
    GazeEuler,
    /// Gaze point + look-at point (2 + 3 = 5 features).
    GazeLookAt,
}

impl FeatureSet {
    /// Length of the vectors this set produces.
    pub fn dim(self) -> usize {
        match self {
            FeatureSet::Gaze => 2,
            FeatureSet::GazeFace => 18,
            FeatureSet::GazeFaceEyes => 50,
            FeatureSet::GazeEuler | FeatureSet::GazeLookAt => 5,
        }
    }
}

impl FeatureExtractor for FeatureSet {
    fn extract(&self, record: &CalibrationRecord) -> DVector<Real> {
        let mut out = Vec::with_capacity(self.dim());
        out.extend_from_slice(&[record.gaze_point.x, record.gaze_point.y]);
        match self {
            FeatureSet::Gaze => {}
            FeatureSet::GazeFace => push_transform(&mut out, &record.face_transform),
            FeatureSet::GazeFaceEyes => {
                push_transform(&mut out, &record.face_transform);
                push_transform(&mut out, &record.right_eye_transform);
                push_transform(&mut out, &record.left_eye_transform);
            }
            FeatureSet::GazeEuler => {
                let e = record.euler_angles();
                out.extend_from_slice(&[e.roll, e.pitch, e.yaw]);
            }
            FeatureSet::GazeLookAt => out.extend(record.look_at_point.coords.iter().copied()),
        }
        DVector::from_vec(out)
    }
}

fn push_transform(out: &mut Vec<Real>, m: &Mat4) {
    // nalgebra storage is column-major
    out.extend(m.iter().copied());
}
