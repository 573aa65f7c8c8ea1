//! Synthetic calibration sessions.
//!
//! Records are generated in a stable order: for each distance, for each head
//! position, for each target.

use nalgebra::{Rotation3, Translation3};

use crate::{CalibrationRecord, DistanceToScreen, HeadPosition, Mat4, Pt2, Pt3, Real, Vec2, Vec3};

use super::noise::UniformPixelNoise;

/// Generate an `nx * ny` grid of targets spanning a `width × height` screen.
///
/// Targets are inset by 10% of the screen on every side and ordered
/// row-major (Y major). A single row or column sits on the screen centre.
pub fn target_grid(nx: usize, ny: usize, width: Real, height: Real) -> Vec<Pt2> {
    let axis = |n: usize, extent: Real| -> Vec<Real> {
        let lo = 0.1 * extent;
        let hi = 0.9 * extent;
        match n {
            0 => Vec::new(),
            1 => vec![0.5 * extent],
            _ => (0..n)
                .map(|i| lo + (hi - lo) * i as Real / (n - 1) as Real)
                .collect(),
        }
    };

    let xs = axis(nx, width);
    let ys = axis(ny, height);
    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            points.push(Pt2::new(x, y));
        }
    }
    points
}

/// Face transform nodding by `nod_deg` (about X), turning by `turn_deg`
/// (about Y) and placed at `translation`.
pub fn face_transform(nod_deg: Real, turn_deg: Real, translation: Vec3) -> Mat4 {
    let rot = Rotation3::from_euler_angles(nod_deg.to_radians(), turn_deg.to_radians(), 0.0);
    Translation3::from(translation).to_homogeneous() * rot.to_homogeneous()
}

/// Nominal `(nod, turn)` in degrees for a requested head position.
pub fn head_angles(position: HeadPosition) -> (Real, Real) {
    match position {
        HeadPosition::Middle => (0.0, 0.0),
        HeadPosition::Top => (-15.0, 0.0),
        HeadPosition::Down => (15.0, 0.0),
        HeadPosition::Left => (0.0, 20.0),
        HeadPosition::Right => (0.0, -20.0),
    }
}

/// Nominal face translation (metres, camera frame) for a holding distance.
pub fn head_translation(distance: DistanceToScreen) -> Vec3 {
    match distance {
        DistanceToScreen::Close => Vec3::new(0.0, 0.0, -0.2),
        DistanceToScreen::Regular => Vec3::new(0.0, 0.0, -0.35),
        DistanceToScreen::ArmsExtended => Vec3::new(0.0, 0.0, -0.55),
    }
}

/// Records for `targets` with a constant gaze offset and a fixed face pose.
///
/// `gaze = target + offset + noise(idx)`.
pub fn records_with_offset(
    targets: &[Pt2],
    offset: Vec2,
    face: Mat4,
    noise: UniformPixelNoise,
) -> Vec<CalibrationRecord> {
    targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let gaze = *target + offset + noise.sample(idx);
            record(*target, gaze, face, HeadPosition::Middle, DistanceToScreen::Regular, idx)
        })
        .collect()
}

/// A complete session: every target at every head position and distance.
pub fn full_session(targets: &[Pt2], offset: Vec2, noise: UniformPixelNoise) -> Vec<CalibrationRecord> {
    let mut records = Vec::with_capacity(
        targets.len() * HeadPosition::ALL.len() * DistanceToScreen::ALL.len(),
    );
    for distance in DistanceToScreen::ALL {
        for position in HeadPosition::ALL {
            let (nod, turn) = head_angles(position);
            let face = face_transform(nod, turn, head_translation(distance));
            for target in targets {
                let idx = records.len();
                let gaze = *target + offset + noise.sample(idx);
                records.push(record(*target, gaze, face, position, distance, idx));
            }
        }
    }
    records
}

fn record(
    target: Pt2,
    gaze: Pt2,
    face: Mat4,
    position: HeadPosition,
    distance: DistanceToScreen,
    idx: usize,
) -> CalibrationRecord {
    CalibrationRecord {
        subject: "synthetic".to_string(),
        device: "synthetic".to_string(),
        head_position: position,
        distance,
        timestamp: idx.to_string(),
        target_point: target,
        gaze_point: gaze,
        face_transform: face,
        right_eye_transform: face * Translation3::new(-0.03, 0.0, 0.0).to_homogeneous(),
        left_eye_transform: face * Translation3::new(0.03, 0.0, 0.0).to_homogeneous(),
        look_at_point: Pt3::new(0.0, 0.0, 1.0),
        euler_angles: None,
    }
}
