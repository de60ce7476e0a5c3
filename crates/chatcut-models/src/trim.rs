//! Source trim ranges.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Sub-range of the source media, in seconds, to extract before upload.
///
/// Carried alongside a submission so only the needed clip has to travel.
/// Performing the trim is the job of a local transcode step; the server
/// is not required to honor these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSpec {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TrimSpec {
    /// Create a trim range, rejecting negative, non-finite or empty ranges.
    pub fn new(start_seconds: f64, end_seconds: f64) -> ModelResult<Self> {
        if !start_seconds.is_finite() || !end_seconds.is_finite() {
            return Err(ModelError::invalid_trim("bounds must be finite numbers"));
        }
        if start_seconds < 0.0 {
            return Err(ModelError::invalid_trim(format!(
                "start {start_seconds}s is negative"
            )));
        }
        if end_seconds <= start_seconds {
            return Err(ModelError::invalid_trim(format!(
                "end {end_seconds}s must be after start {start_seconds}s"
            )));
        }
        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Build from optional request bounds.
    ///
    /// Both missing means no trim; a single bound is an error.
    pub fn from_bounds(start: Option<f64>, end: Option<f64>) -> ModelResult<Option<Self>> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Err(ModelError::invalid_trim(
                "both trim_start and trim_end are required",
            )),
        }
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}
