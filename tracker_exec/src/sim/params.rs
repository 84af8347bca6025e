//! Parameters structure for the simulator

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the kinematic simulator.
///
/// All distances are in map pixels and all speeds in map pixels per update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {

    // ---- MAP ----

    /// Width of the track map.
    pub map_width: u32,

    /// Height of the track map.
    pub map_height: u32,

    /// Stroke width of the elliptical track.
    pub track_thickness: u32,

    // ---- ROBOT ----

    /// Distance between the two drive wheels.
    pub wheelbase: f64,

    /// Wheel speed for a normalised demand of 1.
    pub max_speed: f64,

    // ---- CAMERA ----

    /// Width of the rendered view.
    pub view_width: u32,

    /// Height of the rendered view.
    pub view_height: u32
}

impl Default for Params {
    fn default() -> Self {
        Self {
            map_width: 800,
            map_height: 600,
            track_thickness: 20,
            wheelbase: 40.0,
            max_speed: 5.0,
            view_width: 160,
            view_height: 120
        }
    }
}
