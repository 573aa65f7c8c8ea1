//! Error taxonomy shared by every estimator.

use thiserror::Error;

/// Errors raised while fitting or applying a calibrator.
///
/// Degenerate but well-defined situations (zero total weight in the weighted
/// offset estimator, zero target variance in R²) are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibError {
    /// Empty or malformed input. Always detected before numeric work begins.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The least-squares solve could not produce a finite result.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl CalibError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Bail out with [`CalibError::InvalidInput`] unless `cond` holds.
#[macro_export]
macro_rules! ensure_input {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::CalibError::InvalidInput(format!($($arg)+)));
        }
    };
}
