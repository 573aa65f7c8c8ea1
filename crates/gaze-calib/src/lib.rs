//! High-level entry crate for the `gaze-calib` toolbox.
//!
//! This crate provides **two complementary APIs** for gaze calibration:
//!
//! ## 1. Pipeline API (Single Call)
//!
//! Use when you want to split a recorded session, fit an estimator and get a
//! serializable report back:
//!
//! ```
//! use gaze_calib::core::synthetic::{noise::UniformPixelNoise, session};
//! use gaze_calib::core::Vec2;
//! use gaze_calib::pipeline::{run_calibration, CalibrationConfig, CalibrationInput};
//!
//! # fn main() -> anyhow::Result<()> {
//! let targets = session::target_grid(3, 3, 1133.0, 744.0);
//! let records = session::full_session(&targets, Vec2::new(30.0, -12.0), UniformPixelNoise::default());
//!
//! let report = run_calibration(&CalibrationInput::new(records), &CalibrationConfig::default())?;
//! assert!(report.evaluation_metrics.rmse < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Estimator API (Custom Workflows)
//!
//! Use the estimators directly when you need a custom split, a custom
//! feature extractor, or to keep a fitted model around:
//!
//! ```no_run
//! use gaze_calib::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records: Vec<CalibrationRecord> = /* load a session */
//! # vec![];
//!
//! let calib = RegressionCalibrator::fit(&records, FeatureSet::GazeFaceEyes)?;
//! let metrics = calib.evaluate(&records)?;
//! println!("rmse {:.2}, r2 {:.3}", metrics.rmse, metrics.r2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`pipeline`]**: Configuration, train/test split and reporting
//! - **[`core`]**: Records, categories, transforms, feature extraction
//! - **[`linear`]**: Offset, weighted offset and regression estimators
//! - **[`prelude`]**: Convenient re-exports for common use cases

mod config;
mod report;
mod split;

/// Split, fit, score and report in a single call.
pub mod pipeline {
    pub use crate::config::{CalibrationConfig, CalibrationInput, CalibratorKind};
    pub use crate::report::{CalibrationReport, CategoryError, FittedCalibrator, run_calibration};
    pub use crate::split::split_records;
}

/// Records, categories, transform helpers and feature extraction.
pub mod core {
    pub use gaze_calib_core::*;
}

/// Closed-form calibration estimators and accuracy metrics.
pub mod linear {
    pub use gaze_calib_linear::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use gaze_calib::prelude::*;` to get started quickly.
pub mod prelude {
    pub use crate::core::{
        CalibError, CalibrationRecord, DistanceToScreen, FeatureExtractor, FeatureSet,
        HeadPosition, Mat4, Pt2, Pt3, Real, Vec2,
    };

    pub use crate::linear::{
        AccuracyMetrics, Calibrator, OffsetCalibrator, RegressionCalibrator,
        WeightedOffsetCalibrator,
    };

    pub use crate::pipeline::{
        CalibrationConfig, CalibrationInput, CalibrationReport, CalibratorKind, run_calibration,
    };
}
