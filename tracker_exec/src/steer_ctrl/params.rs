//! Parameters structure for SteerCtrl

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Gains of the steering controller.
///
/// The controller is stepped once per cycle, so the integral and derivative gains are per cycle
/// rather than per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64
}

impl Default for Params {
    fn default() -> Self {
        Self {
            k_p: 0.5,
            k_i: 0.0,
            k_d: 0.1
        }
    }
}
