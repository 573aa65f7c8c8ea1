//! Calibration record: one observation captured during a session.
//!
//! A record pairs a known on-screen target with the raw gaze estimate the
//! tracker produced while the user looked at it, together with the head and
//! eye transforms reported at that instant.

use serde::{Deserialize, Serialize};

use crate::{
    CalibError, DistanceToScreen, EulerAngles, HeadPosition, Mat4, Pt2, Pt3, Real, Vec2,
    euler_angles_from_transform, is_finite_transform,
};

/// A single calibration observation.
///
/// Records are plain values: estimators borrow them read-only and never
/// mutate them.
///
/// # Example
///
/// ```
/// use gaze_calib_core::{CalibrationRecord, Mat4, Pt2};
///
/// let record = CalibrationRecord::builder(Pt2::new(100.0, 200.0), Pt2::new(104.0, 197.0))
///     .face_transform(Mat4::identity())
///     .build()
///     .unwrap();
///
/// let offset = record.offset();
/// assert_eq!(offset.x, 4.0);
/// assert_eq!(offset.y, -3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Subject identifier.
    pub subject: String,
    /// Device identifier.
    pub device: String,
    /// Requested head position for this sample.
    pub head_position: HeadPosition,
    /// Requested distance to the screen for this sample.
    pub distance: DistanceToScreen,
    /// Capture timestamp, kept verbatim.
    pub timestamp: String,
    /// Known displayed target point (screen units).
    pub target_point: Pt2,
    /// Raw measured gaze point (screen units).
    pub gaze_point: Pt2,
    /// Head pose as a 4×4 homogeneous transform.
    pub face_transform: Mat4,
    /// Right eye pose as a 4×4 homogeneous transform.
    pub right_eye_transform: Mat4,
    /// Left eye pose as a 4×4 homogeneous transform.
    pub left_eye_transform: Mat4,
    /// Point the eyes converge on, in face space.
    pub look_at_point: Pt3,
    /// Head orientation, when supplied by the capture layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub euler_angles: Option<EulerAngles>,
}

impl CalibrationRecord {
    /// Start building a record from its target and measured gaze point.
    ///
    /// Every other field defaults to an identity pose, the `Middle`/`Regular`
    /// categories and empty identifiers.
    pub fn builder(target_point: Pt2, gaze_point: Pt2) -> CalibrationRecordBuilder {
        CalibrationRecordBuilder::new(target_point, gaze_point)
    }

    /// Measured gaze minus true target.
    pub fn offset(&self) -> Vec2 {
        self.gaze_point - self.target_point
    }

    /// Head orientation: the supplied angles, otherwise derived from
    /// [`face_transform`](Self::face_transform).
    pub fn euler_angles(&self) -> EulerAngles {
        self.euler_angles
            .unwrap_or_else(|| euler_angles_from_transform(&self.face_transform))
    }

    /// Check that every numeric field is finite.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CalibError> {
        let fields = [
            ("target_point", self.target_point.coords.iter().all(|v| v.is_finite())),
            ("gaze_point", self.gaze_point.coords.iter().all(|v| v.is_finite())),
            ("look_at_point", self.look_at_point.coords.iter().all(|v| v.is_finite())),
            ("face_transform", is_finite_transform(&self.face_transform)),
            ("right_eye_transform", is_finite_transform(&self.right_eye_transform)),
            ("left_eye_transform", is_finite_transform(&self.left_eye_transform)),
            (
                "euler_angles",
                self.euler_angles.is_none_or(|e| e.is_finite()),
            ),
        ];
        for (name, ok) in fields {
            crate::ensure_input!(ok, "record field `{}` has non-finite values", name);
        }
        Ok(())
    }
}

/// Validate every record of a training or evaluation set.
///
/// # Errors
///
/// [`CalibError::InvalidInput`] if `records` is empty or any record fails
/// [`CalibrationRecord::validate`].
pub fn validate_records(records: &[CalibrationRecord]) -> Result<(), CalibError> {
    crate::ensure_input!(!records.is_empty(), "need at least one calibration record");
    for (idx, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| CalibError::InvalidInput(format!("record {idx}: {e}")))?;
    }
    Ok(())
}

/// Build a transform from 16 values in column order.
///
/// This is the order the capture app writes transforms in: all four
/// components of column 0, then column 1, and so on.
///
/// # Errors
///
/// [`CalibError::InvalidInput`] unless exactly 16 values are given.
pub fn transform_from_column_major(values: &[Real]) -> Result<Mat4, CalibError> {
    crate::ensure_input!(
        values.len() == 16,
        "a 4x4 transform needs 16 values, got {}",
        values.len()
    );
    Ok(Mat4::from_column_slice(values))
}

/// Builder for [`CalibrationRecord`].
#[derive(Debug, Clone)]
pub struct CalibrationRecordBuilder {
    record: CalibrationRecord,
}

impl CalibrationRecordBuilder {
    fn new(target_point: Pt2, gaze_point: Pt2) -> Self {
        Self {
            record: CalibrationRecord {
                subject: String::new(),
                device: String::new(),
                head_position: HeadPosition::Middle,
                distance: DistanceToScreen::Regular,
                timestamp: String::new(),
                target_point,
                gaze_point,
                face_transform: Mat4::identity(),
                right_eye_transform: Mat4::identity(),
                left_eye_transform: Mat4::identity(),
                look_at_point: Pt3::new(0.0, 0.0, 1.0),
                euler_angles: None,
            },
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.record.subject = subject.into();
        self
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.record.device = device.into();
        self
    }

    pub fn head_position(mut self, position: HeadPosition) -> Self {
        self.record.head_position = position;
        self
    }

    pub fn distance(mut self, distance: DistanceToScreen) -> Self {
        self.record.distance = distance;
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.record.timestamp = timestamp.into();
        self
    }

    pub fn face_transform(mut self, transform: Mat4) -> Self {
        self.record.face_transform = transform;
        self
    }

    pub fn eye_transforms(mut self, right: Mat4, left: Mat4) -> Self {
        self.record.right_eye_transform = right;
        self.record.left_eye_transform = left;
        self
    }

    pub fn look_at_point(mut self, point: Pt3) -> Self {
        self.record.look_at_point = point;
        self
    }

    pub fn euler_angles(mut self, angles: EulerAngles) -> Self {
        self.record.euler_angles = Some(angles);
        self
    }

    /// Finish the record.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidInput`] if any numeric field is non-finite.
    pub fn build(self) -> Result<CalibrationRecord, CalibError> {
        self.record.validate()?;
        Ok(self.record)
    }
}
