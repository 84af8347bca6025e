//! Parameters structure for LineDet

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for line detection.
///
/// These are the live-tunable values, they are re-read from file while the executable runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Maximum value of every colour channel for a pixel to be part of the marker.
    pub threshold: u8,

    /// Regions enclosing this area or less are rejected.
    ///
    /// Units: pixels
    pub min_area: u32,

    /// Regions whose bounding rectangle is less elongated than this are rejected.
    pub min_aspect_ratio: f64
}

impl Default for Params {
    fn default() -> Self {
        Self {
            threshold: 60,
            min_area: 1000,
            min_aspect_ratio: 1.0
        }
    }
}
