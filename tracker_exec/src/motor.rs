//! # Motor interface
//!
//! Wheel speed demands and the sinks which execute them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;
use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Something which drives the left and right wheels.
///
/// Speeds are normalised, implementors shall clamp them into [-1, 1].
pub trait MotorSink {
    fn set_speed(&mut self, left: f64, right: f64);

    fn stop(&mut self) {
        self.set_speed(0.0, 0.0);
    }
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Normalised left and right wheel speed demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DriveCmd {
    /// Left wheel speed, positive forwards
    pub left: f64,

    /// Right wheel speed, positive forwards
    pub right: f64
}

/// A motor sink which only logs its demands.
#[derive(Debug, Default)]
pub struct MockMotors {
    last: DriveCmd,
    num_demands: u64
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl DriveCmd {
    /// Mix a forward speed and a steering correction into wheel speeds.
    ///
    /// A positive correction turns towards the right of the camera image. If the image is
    /// mirrored the correction is applied the other way round.
    pub fn from_steering(base_speed: f64, steering: f64, mirror: bool) -> Self {
        let s = if mirror { -steering } else { steering };

        Self {
            left: clamp_unit(base_speed + s),
            right: clamp_unit(base_speed - s)
        }
    }

    /// Both wheels stopped.
    pub fn stop() -> Self {
        Self::default()
    }

    /// The demand with both speeds clamped into [-1, 1].
    pub fn clamped(self) -> Self {
        Self {
            left: clamp_unit(self.left),
            right: clamp_unit(self.right)
        }
    }
}

impl MockMotors {
    /// Create a stopped mock motor interface.
    pub fn new() -> Self {
        info!("Motor interface initialised (mock)");
        Self::default()
    }

    /// The last demand sent to the motors, after clamping.
    pub fn last(&self) -> DriveCmd {
        self.last
    }

    /// Number of demands received since creation.
    pub fn num_demands(&self) -> u64 {
        self.num_demands
    }
}

impl MotorSink for MockMotors {
    fn set_speed(&mut self, left: f64, right: f64) {
        self.last = DriveCmd { left, right }.clamped();
        self.num_demands += 1;

        info!("Motors -> Left: {:.2}, Right: {:.2}", self.last.left, self.last.right);
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn clamp_unit(value: f64) -> f64 {
    value.max(-1.0).min(1.0)
}
