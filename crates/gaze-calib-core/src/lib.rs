//! Core math and data model for `gaze-calibration`.
//!
//! This crate provides the building blocks shared by every estimator:
//!
//! - linear algebra type aliases (`Real`, `Vec2`, `Mat4`, and friends) and
//!   helpers for reading head/eye transforms,
//! - the [`CalibrationRecord`] data model with its closed
//!   [`HeadPosition`] / [`DistanceToScreen`] categories,
//! - the [`FeatureExtractor`] capability and built-in [`FeatureSet`]s,
//! - the [`CalibError`] taxonomy.
//!
//! # Modules
//!
//! - \[`math`\]: type aliases, transform accessors, Euler decomposition.
//! - \[`types`\]: calibration records and session categories.
//! - \[`features`\]: feature extraction for regression calibrators.
//! - \[`synthetic`\]: deterministic synthetic sessions (tests/examples).

/// Error taxonomy.
mod error;
/// Feature extraction capability.
mod features;
/// Linear algebra type aliases and helpers.
mod math;
/// Deterministic synthetic data generation helpers.
///
/// Used in workspace tests and examples; also handy for benchmarking and
/// regression testing.
pub mod synthetic;
/// Calibration records and categories.
mod types;

pub use error::*;
pub use features::*;
pub use math::*;
pub use types::*;
