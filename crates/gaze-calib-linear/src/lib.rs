//! Gaze calibration estimators.
//!
//! Every estimator is fitted once from a slice of
//! [`CalibrationRecord`](gaze_calib_core::CalibrationRecord)s and is read-only
//! afterwards:
//!
//! - [`OffsetCalibrator`]: subtracts the mean `gaze − target` offset,
//! - [`WeightedOffsetCalibrator`]: same, weighted by [`face_forwardness`],
//! - [`RegressionCalibrator`]: least-squares linear model over extracted
//!   features.
//!
//! All three implement [`Calibrator`], which provides a shared
//! [`evaluate`](Calibrator::evaluate) returning [`AccuracyMetrics`].

mod calibrator;
pub mod math;
mod metrics;
mod offset;
mod regression;
mod weighted_offset;

pub use calibrator::*;
pub use metrics::*;
pub use offset::*;
pub use regression::*;
pub use weighted_offset::*;
