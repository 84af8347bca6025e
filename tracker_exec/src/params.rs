//! # Tracker Executable Parameters
//!
//! This module provides parameters for the tracker executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Errors in the values of the executable parameters.
#[derive(Debug, Error)]
pub enum ExecParamsError {
    #[error("The cycle period must be a positive, finite number of seconds, found {0}")]
    InvalidCyclePeriod(f64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerExecParams {

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Normalised forward speed of both wheels before steering is applied.
    pub base_speed: f64,

    /// Flip the steering polarity, for cameras mounted so that their image is mirrored.
    ///
    /// This is combined with the frame source's own mirroring.
    pub mirror_steering: bool,

    /// Save the annotated frame (and the simulator map) every this many cycles. Zero disables
    /// saving.
    pub save_frames_every: u64
}

impl TrackerExecParams {
    /// The cycle period as a duration, checking that it is positive and representable.
    pub fn cycle_period(&self) -> Result<Duration, ExecParamsError> {
        let s = self.cycle_period_s;

        if s.is_finite() && s > 0.0 && s < u64::MAX as f64 {
            Ok(Duration::from_secs_f64(s))
        }
        else {
            Err(ExecParamsError::InvalidCyclePeriod(s))
        }
    }
}

impl Default for TrackerExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.03,
            base_speed: 0.5,
            mirror_steering: false,
            save_frames_every: 50
        }
    }
}
