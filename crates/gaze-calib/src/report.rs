//! Fitting and reporting for a configured calibration run.

use std::collections::BTreeMap;

use anyhow::{Context, Result, ensure};
use gaze_calib_core::{
    CalibError, CalibrationRecord, DistanceToScreen, FeatureSet, HeadPosition, Pt2, Real, Vec2,
    validate_records,
};
use gaze_calib_linear::{
    AccuracyMetrics, Calibrator, LinearModel, OffsetCalibrator, RegressionCalibrator,
    WeightedOffsetCalibrator,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{CalibrationConfig, CalibrationInput, CalibratorKind};
use crate::split::split_records;

/// A fitted estimator of any configured kind.
#[derive(Debug, Clone)]
pub enum FittedCalibrator {
    Offset(OffsetCalibrator),
    WeightedOffset(WeightedOffsetCalibrator),
    Regression(RegressionCalibrator<FeatureSet>),
}

impl FittedCalibrator {
    /// Fit the estimator selected by `config.kind`.
    pub fn fit(
        records: &[CalibrationRecord],
        config: &CalibrationConfig,
    ) -> Result<Self, CalibError> {
        Ok(match config.kind {
            CalibratorKind::Offset => Self::Offset(OffsetCalibrator::fit(records)?),
            CalibratorKind::WeightedOffset => {
                Self::WeightedOffset(WeightedOffsetCalibrator::fit(records)?)
            }
            CalibratorKind::Regression => {
                Self::Regression(RegressionCalibrator::fit(records, config.features)?)
            }
        })
    }

    pub fn kind(&self) -> CalibratorKind {
        match self {
            Self::Offset(_) => CalibratorKind::Offset,
            Self::WeightedOffset(_) => CalibratorKind::WeightedOffset,
            Self::Regression(_) => CalibratorKind::Regression,
        }
    }

    /// Fitted offset, for the offset kinds.
    pub fn offset(&self) -> Option<Vec2> {
        match self {
            Self::Offset(c) => Some(c.offset()),
            Self::WeightedOffset(c) => Some(c.offset()),
            Self::Regression(_) => None,
        }
    }

    /// Fitted linear model, for the regression kind.
    pub fn model(&self) -> Option<&LinearModel> {
        match self {
            Self::Regression(c) => Some(c.model()),
            _ => None,
        }
    }
}

impl Calibrator for FittedCalibrator {
    fn calibrate_record(&self, record: &CalibrationRecord) -> Result<Pt2, CalibError> {
        match self {
            Self::Offset(c) => c.calibrate_record(record),
            Self::WeightedOffset(c) => c.calibrate_record(record),
            Self::Regression(c) => c.calibrate_record(record),
        }
    }
}

/// Mean Euclidean error of one record category before and after calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryError {
    pub category: String,
    pub count: usize,
    pub uncalibrated_error: Real,
    pub calibrated_error: Real,
}

/// Outcome of [`run_calibration`].
///
/// Metrics in `evaluation_*` are computed on the held-out records, or on the
/// training records when nothing was held out. `r2` may be NaN, which
/// serde_json writes as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub kind: CalibratorKind,
    /// Feature set of the regression model; `None` for the offset kinds.
    pub features: Option<FeatureSet>,
    pub num_train: usize,
    pub num_test: usize,
    pub train_metrics: AccuracyMetrics,
    /// Raw gaze points scored against the targets on the evaluation records.
    pub uncalibrated_metrics: AccuracyMetrics,
    pub evaluation_metrics: AccuracyMetrics,
    pub offset: Option<Vec2>,
    pub model: Option<LinearModel>,
    pub per_head_position: Vec<CategoryError>,
    pub per_distance: Vec<CategoryError>,
}

/// Split `input`, fit the configured estimator on the training part and
/// score it.
pub fn run_calibration(
    input: &CalibrationInput,
    config: &CalibrationConfig,
) -> Result<CalibrationReport> {
    config.validate()?;
    ensure!(!input.records.is_empty(), "no calibration records");
    validate_records(&input.records).context("invalid calibration records")?;

    let (train, test) = split_records(&input.records, config.holdout_fraction, config.seed);
    info!(
        "fitting {:?} calibrator on {} records ({} held out)",
        config.kind,
        train.len(),
        test.len()
    );

    let calibrator = FittedCalibrator::fit(&train, config).context("fitting calibrator")?;
    let train_metrics = calibrator
        .evaluate(&train)
        .context("scoring training records")?;

    let eval = if test.is_empty() { &train } else { &test };
    let predicted = eval
        .iter()
        .map(|r| calibrator.calibrate_record(r))
        .collect::<Result<Vec<_>, _>>()
        .context("calibrating evaluation records")?;
    let targets: Vec<Pt2> = eval.iter().map(|r| r.target_point).collect();
    let gaze: Vec<Pt2> = eval.iter().map(|r| r.gaze_point).collect();

    let evaluation_metrics = AccuracyMetrics::from_points(&predicted, &targets)?;
    let uncalibrated_metrics = AccuracyMetrics::from_points(&gaze, &targets)?;
    debug!(
        "evaluation rmse {:.3} (uncalibrated {:.3})",
        evaluation_metrics.rmse, uncalibrated_metrics.rmse
    );

    let per_head_position = category_errors(eval, &predicted, |r| r.head_position);
    let per_distance = category_errors(eval, &predicted, |r| r.distance);

    Ok(CalibrationReport {
        kind: calibrator.kind(),
        features: (config.kind == CalibratorKind::Regression).then_some(config.features),
        num_train: train.len(),
        num_test: test.len(),
        train_metrics,
        uncalibrated_metrics,
        evaluation_metrics,
        offset: calibrator.offset(),
        model: calibrator.model().cloned(),
        per_head_position,
        per_distance,
    })
}

trait Category: Ord + Copy {
    fn name(self) -> &'static str;
}

impl Category for HeadPosition {
    fn name(self) -> &'static str {
        self.label()
    }
}

impl Category for DistanceToScreen {
    fn name(self) -> &'static str {
        self.label()
    }
}

fn category_errors<C: Category>(
    records: &[CalibrationRecord],
    predicted: &[Pt2],
    key: impl Fn(&CalibrationRecord) -> C,
) -> Vec<CategoryError> {
    let mut groups: BTreeMap<C, (usize, Real, Real)> = BTreeMap::new();
    for (r, p) in records.iter().zip(predicted) {
        let entry = groups.entry(key(r)).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += (r.gaze_point - r.target_point).norm();
        entry.2 += (*p - r.target_point).norm();
    }

    groups
        .into_iter()
        .map(|(c, (count, raw, calibrated))| CategoryError {
            category: c.name().to_string(),
            count,
            uncalibrated_error: raw / count as Real,
            calibrated_error: calibrated / count as Real,
        })
        .collect()
}
