use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised when a numeric field falls outside its allowed range.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValueError {
    #[error("progress percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(u8),

    #[error("hours spent must be a non-negative number, got {0}")]
    InvalidHours(f64),
}

//
// ─── PROGRESS PERCENTAGE ───────────────────────────────────────────────────────
//

/// Whole-number progress in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ProgressPercentage(u8);

impl ProgressPercentage {
    pub const MAX: u8 = 100;

    /// Creates a validated percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::PercentageOutOfRange` if `value > 100`.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::PercentageOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ProgressPercentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProgressPercentage> for u8 {
    fn from(value: ProgressPercentage) -> Self {
        value.0
    }
}

//
// ─── STUDY HOURS ───────────────────────────────────────────────────────────────
//

/// Time spent studying, in (possibly fractional) hours. Finite and `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StudyHours(f64);

impl StudyHours {
    pub const ZERO: Self = Self(0.0);

    /// Creates a validated hour count.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHours` if `value` is negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValueError::InvalidHours(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for StudyHours {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudyHours> for f64 {
    fn from(value: StudyHours) -> Self {
        value.0
    }
}
