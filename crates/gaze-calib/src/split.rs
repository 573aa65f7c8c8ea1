//! Deterministic train/test split.

use gaze_calib_core::{CalibrationRecord, Real};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Split `records` into `(train, test)` after a seeded shuffle.
///
/// The test share is `round(n · holdout_fraction)`, capped so that at least
/// one record is left for training. Both parts keep the input order.
pub fn split_records(
    records: &[CalibrationRecord],
    holdout_fraction: Real,
    seed: u64,
) -> (Vec<CalibrationRecord>, Vec<CalibrationRecord>) {
    let n = records.len();
    let n_test = ((n as Real) * holdout_fraction.clamp(0.0, 1.0)).round() as usize;
    let n_test = n_test.min(n.saturating_sub(1));

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test_idx = indices[..n_test].to_vec();
    let mut train_idx = indices[n_test..].to_vec();
    test_idx.sort_unstable();
    train_idx.sort_unstable();

    let pick = |idx: &[usize]| idx.iter().map(|&i| records[i].clone()).collect::<Vec<_>>();
    (pick(&train_idx), pick(&test_idx))
}
