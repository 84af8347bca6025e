//! # Line detection module
//!
//! Finds the dark marker line in a frame and measures how far its centroid sits from the
//! frame's vertical centreline.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod contour;
mod geometry;
mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use contour::{find_outer_contours, marker_mask, MARKER};
pub use geometry::*;
pub use params::*;
pub use state::*;
