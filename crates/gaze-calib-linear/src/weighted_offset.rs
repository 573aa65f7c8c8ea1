//! Pose-weighted offset calibration.
//!
//! Samples captured while the head is turned away from the sensor are noisier
//! estimates of the true gaze bias. Each offset is weighted by how directly
//! the face points at the sensor before averaging.

use gaze_calib_core::{
    CalibError, CalibrationRecord, FORWARD, Mat4, Pt2, Real, Vec2, forward_axis, validate_records,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{Calibrator, math::weighted_mean_offset};

/// How directly a head pose faces the sensor.
///
/// Dot product of the transform's forward axis (column 2 of the rotation
/// block) with `(0, 0, 1)`, clamped below at zero. Close to 1 for a face
/// looking straight at the sensor, 0 when turned sideways or away.
pub fn face_forwardness(face_transform: &Mat4) -> Real {
    forward_axis(face_transform).dot(&FORWARD).max(0.0)
}

/// Corrects gaze points by subtracting a forwardness-weighted mean offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedOffsetCalibrator {
    offset: Vec2,
    total_weight: Real,
}

impl WeightedOffsetCalibrator {
    /// Fit `Σ offset_i·w_i / Σ w_i` with `w_i = face_forwardness(face_i)`.
    ///
    /// When every record faces away from the sensor the total weight is zero
    /// and the fitted offset is the zero vector (no correction).
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if `records` is empty or a record holds
    /// non-finite values.
    pub fn fit(records: &[CalibrationRecord]) -> Result<Self, CalibError> {
        validate_records(records)?;

        let weights: Vec<Real> = records
            .iter()
            .map(|r| face_forwardness(&r.face_transform))
            .collect();
        let (offset, total_weight) = weighted_mean_offset(records, &weights);

        if total_weight == 0.0 {
            warn!(
                "weighted offset calibrator: no record faces the sensor ({} records), using zero offset",
                records.len()
            );
        } else {
            debug!(
                "weighted offset calibrator: {} records, total weight {:.3}, offset ({:.3}, {:.3})",
                records.len(),
                total_weight,
                offset.x,
                offset.y
            );
        }

        Ok(Self {
            offset,
            total_weight,
        })
    }

    /// The fitted weighted offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Sum of the forwardness weights seen during fitting.
    pub fn total_weight(&self) -> Real {
        self.total_weight
    }

    /// `point − offset`.
    pub fn calibrate(&self, point: Pt2) -> Pt2 {
        point - self.offset
    }
}

impl Calibrator for WeightedOffsetCalibrator {
    fn calibrate_record(&self, record: &CalibrationRecord) -> Result<Pt2, CalibError> {
        Ok(self.calibrate(record.gaze_point))
    }
}
