//! Serde-configurable options for the calibration pipeline.

use anyhow::{Result, ensure};
use gaze_calib_core::{CalibrationRecord, FeatureSet, Real};
use serde::{Deserialize, Serialize};

/// Which estimator to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibratorKind {
    /// Unweighted mean offset.
    Offset,
    /// Face-forwardness weighted mean offset.
    #[default]
    WeightedOffset,
    /// Least-squares linear model over [`FeatureSet`] features.
    Regression,
}

/// Pipeline configuration.
///
/// Every field has a default, so `{}` is a valid configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Estimator to fit. Default: weighted offset.
    #[serde(default)]
    pub kind: CalibratorKind,
    /// Features for the regression estimator; ignored by the offset kinds.
    /// Default: gaze point + face transform.
    #[serde(default)]
    pub features: FeatureSet,
    /// Share of records held out for scoring, in `[0, 1)`. Default is 0.2.
    #[serde(default = "default_holdout_fraction")]
    pub holdout_fraction: Real,
    /// Seed of the train/test shuffle.
    #[serde(default)]
    pub seed: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            kind: CalibratorKind::default(),
            features: FeatureSet::default(),
            holdout_fraction: default_holdout_fraction(),
            seed: 0,
        }
    }
}

impl CalibrationConfig {
    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..1.0).contains(&self.holdout_fraction),
            "holdout_fraction must be in [0, 1), got {}",
            self.holdout_fraction
        );
        Ok(())
    }
}

fn default_holdout_fraction() -> Real {
    0.2
}

/// Records to calibrate from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub records: Vec<CalibrationRecord>,
}

impl CalibrationInput {
    pub fn new(records: Vec<CalibrationRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }
}
