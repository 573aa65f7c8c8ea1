use gaze_calib_core::{
    CalibError, CalibrationRecord, FeatureExtractor, FeatureSet, Mat4, Pt2, Real, Vec2, Vec3,
    synthetic::{
        noise::UniformPixelNoise,
        session::{face_transform, full_session, records_with_offset, target_grid},
    },
};
use gaze_calib_linear::{
    Calibrator, OffsetCalibrator, RegressionCalibrator, WeightedOffsetCalibrator,
    face_forwardness,
};
use nalgebra::{DVector, Matrix2x3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SessionFixture {
    mean_offset: [Real; 2],
    weighted_offset: [Real; 2],
    records: Vec<CalibrationRecord>,
}

fn load_fixture() -> SessionFixture {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("session.json");
    let contents = fs::read_to_string(&path).expect("read session.json");
    serde_json::from_str(&contents).expect("parse session.json")
}

fn screen_targets() -> Vec<Pt2> {
    target_grid(3, 3, 1133.0, 744.0)
}

#[test]
fn fixture_offsets_match_reference_values() {
    let data = load_fixture();

    let offset = OffsetCalibrator::fit(&data.records).unwrap();
    let expected = Vec2::new(data.mean_offset[0], data.mean_offset[1]);
    assert!(
        (offset.offset() - expected).norm() < 1e-9,
        "mean offset {:?} vs {:?}",
        offset.offset(),
        expected
    );

    let weighted = WeightedOffsetCalibrator::fit(&data.records).unwrap();
    let expected = Vec2::new(data.weighted_offset[0], data.weighted_offset[1]);
    assert!(
        (weighted.offset() - expected).norm() < 1e-9,
        "weighted offset {:?} vs {:?}",
        weighted.offset(),
        expected
    );
}

#[test]
fn offset_calibrator_removes_known_bias() {
    let offsets = [(1.0, 0.0), (3.0, 0.0), (2.0, 0.0)];
    let records: Vec<CalibrationRecord> = offsets
        .iter()
        .enumerate()
        .map(|(i, (dx, dy))| {
            let target = Pt2::new(100.0 * i as Real, 50.0);
            CalibrationRecord::builder(target, Pt2::new(target.x + dx, target.y + dy))
                .build()
                .unwrap()
        })
        .collect();

    let calib = OffsetCalibrator::fit(&records).unwrap();
    let p = calib.calibrate(Pt2::new(5.0, 5.0));
    assert!((p - Pt2::new(3.0, 5.0)).norm() < 1e-12);
}

#[test]
fn weighted_equals_unweighted_for_frontal_faces() {
    let noise = UniformPixelNoise::new(7, 15.0);
    let records = records_with_offset(
        &screen_targets(),
        Vec2::new(-20.0, 35.0),
        Mat4::identity(),
        noise,
    );

    let plain = OffsetCalibrator::fit(&records).unwrap();
    let weighted = WeightedOffsetCalibrator::fit(&records).unwrap();

    assert!((plain.offset() - weighted.offset()).norm() < 1e-9);
    assert!((weighted.total_weight() - records.len() as Real).abs() < 1e-12);

    let p = Pt2::new(400.0, 300.0);
    assert!((plain.calibrate(p) - weighted.calibrate(p)).norm() < 1e-9);
}

#[test]
fn weighted_offset_is_zero_when_no_face_points_at_the_sensor() {
    let sideways = face_transform(0.0, 90.0, Vec3::new(0.0, 0.0, -0.3));
    let opposite = face_transform(0.0, 180.0, Vec3::new(0.0, 0.0, -0.3));
    assert!(face_forwardness(&sideways) < 1e-12);
    assert_eq!(face_forwardness(&opposite), 0.0);

    // exact zeros for the forward column's z component
    let mut orthogonal = Mat4::identity();
    orthogonal.fixed_view_mut::<3, 3>(0, 0).copy_from(&nalgebra::Matrix3::new(
        0.0, 0.0, 1.0, //
        0.0, 1.0, 0.0, //
        -1.0, 0.0, 0.0,
    ));
    let mut reversed = Mat4::identity();
    reversed[(0, 0)] = -1.0;
    reversed[(2, 2)] = -1.0;

    let targets = screen_targets();
    let mut records = records_with_offset(
        &targets,
        Vec2::new(12.0, -4.0),
        orthogonal,
        UniformPixelNoise::default(),
    );
    records.extend(records_with_offset(
        &targets,
        Vec2::new(30.0, 9.0),
        reversed,
        UniformPixelNoise::default(),
    ));

    let calib = WeightedOffsetCalibrator::fit(&records).unwrap();
    assert_eq!(calib.offset(), Vec2::zeros());
    assert_eq!(calib.total_weight(), 0.0);
    assert_eq!(calib.calibrate(Pt2::new(10.0, 20.0)), Pt2::new(10.0, 20.0));
}

#[test]
fn weighted_offset_prefers_frontal_samples() {
    let targets = screen_targets();
    let frontal = records_with_offset(
        &targets,
        Vec2::new(10.0, 10.0),
        Mat4::identity(),
        UniformPixelNoise::default(),
    );
    let turned = records_with_offset(
        &targets,
        Vec2::new(80.0, -60.0),
        face_transform(0.0, 75.0, Vec3::zeros()),
        UniformPixelNoise::default(),
    );
    let records: Vec<CalibrationRecord> = frontal.into_iter().chain(turned).collect();

    let plain = OffsetCalibrator::fit(&records).unwrap();
    let weighted = WeightedOffsetCalibrator::fit(&records).unwrap();
    let truth = Vec2::new(10.0, 10.0);
    assert!((weighted.offset() - truth).norm() < (plain.offset() - truth).norm());
}

#[test]
fn regression_recovers_exact_linear_relation() {
    // target = A · [gaze.x, gaze.y, face.tx] + c
    let a = Matrix2x3::new(0.9, 0.05, 120.0, -0.02, 1.1, -40.0);
    let c = Vec2::new(-15.0, 22.0);

    let noise = UniformPixelNoise::new(3, 0.05);
    let records: Vec<CalibrationRecord> = screen_targets()
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let tx = noise.sample_scalar(i, 0);
            let gaze = Pt2::new(g.x + 3.0 * i as Real, g.y - 2.0 * (i % 4) as Real);
            let f = nalgebra::Vector3::new(gaze.x, gaze.y, tx);
            let target = a * f + c;
            CalibrationRecord::builder(Pt2::new(target.x, target.y), gaze)
                .face_transform(face_transform(0.0, 0.0, Vec3::new(tx, 0.0, -0.3)))
                .build()
                .unwrap()
        })
        .collect();

    let extractor = |r: &CalibrationRecord| {
        DVector::from_vec(vec![r.gaze_point.x, r.gaze_point.y, r.face_transform[(0, 3)]])
    };
    let calib = RegressionCalibrator::fit(&records, extractor).unwrap();
    let model = calib.model();

    for row in 0..2 {
        for col in 0..3 {
            let est = model.coefficients[(col, row)];
            assert!(
                (est - a[(row, col)]).abs() < 1e-6,
                "coefficient ({row}, {col}): {est} vs {}",
                a[(row, col)]
            );
        }
    }
    assert!((model.intercept - c).norm() < 1e-6);

    let metrics = calib.evaluate(&records).unwrap();
    assert!(metrics.mse < 1e-12, "mse {}", metrics.mse);
    assert!((metrics.r2 - 1.0).abs() < 1e-12, "r2 {}", metrics.r2);
    assert_eq!(metrics.rmse, metrics.mse.sqrt());
}

#[test]
fn reference_features_fit_an_offset_session_exactly() {
    let records = full_session(
        &screen_targets(),
        Vec2::new(25.0, -18.0),
        UniformPixelNoise::default(),
    );

    let calib = RegressionCalibrator::fit(&records, FeatureSet::GazeFace).unwrap();
    assert_eq!(calib.model().num_features(), 18);

    let metrics = calib.evaluate(&records).unwrap();
    assert!(metrics.mse < 1e-8, "mse {}", metrics.mse);
    assert!((metrics.r2 - 1.0).abs() < 1e-9);

    let features = FeatureSet::GazeFace.extract(&records[10]);
    let p = calib.calibrate(&features).unwrap();
    assert!((p - records[10].target_point).norm() < 1e-6);
}

#[test]
fn rmse_is_always_the_root_of_mse() {
    let noise = UniformPixelNoise::new(99, 40.0);
    let records = full_session(&screen_targets(), Vec2::new(5.0, 5.0), noise);
    let (train, test) = records.split_at(records.len() / 2);

    let offset = OffsetCalibrator::fit(train).unwrap();
    let weighted = WeightedOffsetCalibrator::fit(train).unwrap();
    let regression = RegressionCalibrator::fit(train, FeatureSet::GazeFaceEyes).unwrap();

    let calibrators: [&dyn Calibrator; 3] = [&offset, &weighted, &regression];
    for calib in calibrators {
        let m = calib.evaluate(test).unwrap();
        assert_eq!(m.rmse, m.mse.sqrt());
        assert!(m.mean_euclidean_error >= 0.0);
    }
}

#[test]
fn calibrate_is_idempotent_for_every_estimator() {
    let records = full_session(
        &screen_targets(),
        Vec2::new(-3.0, 8.0),
        UniformPixelNoise::new(1, 5.0),
    );
    let offset = OffsetCalibrator::fit(&records).unwrap();
    let weighted = WeightedOffsetCalibrator::fit(&records).unwrap();
    let regression = RegressionCalibrator::fit(&records, FeatureSet::GazeEuler).unwrap();

    let p = Pt2::new(321.0, 123.0);
    assert_eq!(offset.calibrate(p), offset.calibrate(p));
    assert_eq!(weighted.calibrate(p), weighted.calibrate(p));

    let f = FeatureSet::GazeEuler.extract(&records[0]);
    assert_eq!(
        regression.calibrate(&f).unwrap(),
        regression.calibrate(&f).unwrap()
    );
}

#[test]
fn empty_input_is_rejected_by_every_estimator() {
    assert!(matches!(
        OffsetCalibrator::fit(&[]),
        Err(CalibError::InvalidInput(_))
    ));
    assert!(matches!(
        WeightedOffsetCalibrator::fit(&[]),
        Err(CalibError::InvalidInput(_))
    ));
    assert!(matches!(
        RegressionCalibrator::fit(&[], FeatureSet::GazeFace),
        Err(CalibError::InvalidInput(_))
    ));
}

#[test]
fn wrong_feature_length_is_rejected_at_calibrate_time() {
    let records = full_session(&screen_targets(), Vec2::zeros(), UniformPixelNoise::default());
    let calib = RegressionCalibrator::fit(&records, FeatureSet::GazeFace).unwrap();

    let short = FeatureSet::Gaze.extract(&records[0]);
    assert!(matches!(
        calib.calibrate(&short),
        Err(CalibError::InvalidInput(_))
    ));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn fitted_estimators_are_send_and_sync() {
    assert_send_sync::<OffsetCalibrator>();
    assert_send_sync::<WeightedOffsetCalibrator>();
    assert_send_sync::<RegressionCalibrator<FeatureSet>>();
}

#[test]
fn one_fitted_model_serves_several_threads() {
    let records = full_session(
        &screen_targets(),
        Vec2::new(6.0, -9.0),
        UniformPixelNoise::new(4, 3.0),
    );
    let offset = OffsetCalibrator::fit(&records).unwrap();
    let regression = RegressionCalibrator::fit(&records, FeatureSet::GazeFace).unwrap();

    let expected: Vec<(Pt2, Pt2)> = records
        .iter()
        .map(|r| {
            (
                offset.calibrate(r.gaze_point),
                regression.calibrate_record(r).unwrap(),
            )
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    records
                        .iter()
                        .map(|r| {
                            (
                                offset.calibrate(r.gaze_point),
                                regression.calibrate_record(r).unwrap(),
                            )
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
