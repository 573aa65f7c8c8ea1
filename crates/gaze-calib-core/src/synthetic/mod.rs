//! Deterministic synthetic data generation helpers.
//!
//! This module provides small, reusable building blocks for constructing
//! synthetic calibration sessions used in tests and examples:
//! - on-screen target grids,
//! - head poses for each [`crate::HeadPosition`],
//! - records with a known gaze offset,
//! - deterministic pseudo-random noise utilities.
//!
//! The helpers are deterministic (explicit seeds; stable record ordering).
//!
//! # Example
//!
//! ```
//! use gaze_calib_core::{Vec2, synthetic::{noise::UniformPixelNoise, session}};
//!
//! let targets = session::target_grid(3, 3, 1133.0, 744.0);
//! let records = session::full_session(&targets, Vec2::new(12.0, -8.0), UniformPixelNoise::default());
//! assert_eq!(records.len(), 9 * 5 * 3);
//! ```

pub mod noise;
pub mod session;
