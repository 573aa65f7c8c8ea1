//! Constant-bias calibration from the unweighted mean gaze offset.
//!
//! Assumes a single constant bias dominates the tracker error regardless of
//! head pose. It is the cheapest estimator and the baseline the others are
//! compared against.

use gaze_calib_core::{CalibError, CalibrationRecord, Pt2, Vec2, validate_records};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Calibrator, math::mean_offset};

/// Corrects gaze points by subtracting the mean `gaze − target` offset.
///
/// # Example
///
/// ```
/// use gaze_calib_core::{CalibrationRecord, Pt2};
/// use gaze_calib_linear::OffsetCalibrator;
///
/// let records: Vec<CalibrationRecord> = [(1.0, 0.0), (3.0, 0.0), (2.0, 0.0)]
///     .into_iter()
///     .map(|(dx, dy)| {
///         CalibrationRecord::builder(Pt2::new(10.0, 10.0), Pt2::new(10.0 + dx, 10.0 + dy))
///             .build()
///             .unwrap()
///     })
///     .collect();
///
/// let calib = OffsetCalibrator::fit(&records).unwrap();
/// assert_eq!(calib.calibrate(Pt2::new(5.0, 5.0)), Pt2::new(3.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetCalibrator {
    offset: Vec2,
}

impl OffsetCalibrator {
    /// Fit the mean offset over `records`.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if `records` is empty or a record holds
    /// non-finite values.
    pub fn fit(records: &[CalibrationRecord]) -> Result<Self, CalibError> {
        validate_records(records)?;
        let offset = mean_offset(records)
            .ok_or_else(|| CalibError::InvalidInput("need at least one calibration record".into()))?;
        debug!(
            "offset calibrator: {} records, mean offset ({:.3}, {:.3})",
            records.len(),
            offset.x,
            offset.y
        );
        Ok(Self { offset })
    }

    /// Build directly from a known offset.
    pub fn from_offset(offset: Vec2) -> Self {
        Self { offset }
    }

    /// The fitted mean offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// `point − offset`.
    pub fn calibrate(&self, point: Pt2) -> Pt2 {
        point - self.offset
    }
}

impl Calibrator for OffsetCalibrator {
    fn calibrate_record(&self, record: &CalibrationRecord) -> Result<Pt2, CalibError> {
        Ok(self.calibrate(record.gaze_point))
    }
}
