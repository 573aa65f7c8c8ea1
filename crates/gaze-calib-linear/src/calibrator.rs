//! The seam every estimator implements.

use gaze_calib_core::{CalibError, CalibrationRecord, Pt2, validate_records};

use crate::AccuracyMetrics;

/// A fitted calibrator that can correct a record's gaze estimate.
///
/// Offset calibrators correct the record's gaze point; regression calibrators
/// extract features from the whole record. Either way the fitted state is
/// read-only, so `&self` methods are safe to call concurrently.
pub trait Calibrator {
    /// Corrected on-screen point for `record`.
    fn calibrate_record(&self, record: &CalibrationRecord) -> Result<Pt2, CalibError>;

    /// Score the calibrator on held-out records.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if `records` is empty or malformed, or if
    /// a record cannot be calibrated.
    fn evaluate(&self, records: &[CalibrationRecord]) -> Result<AccuracyMetrics, CalibError> {
        validate_records(records)?;
        let predicted = records
            .iter()
            .map(|r| self.calibrate_record(r))
            .collect::<Result<Vec<_>, _>>()?;
        let actual: Vec<Pt2> = records.iter().map(|r| r.target_point).collect();
        AccuracyMetrics::from_points(&predicted, &actual)
    }
}
