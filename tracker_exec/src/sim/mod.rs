//! # Kinematic simulator module
//!
//! A differential drive robot on a flat, static track map. The simulator renders the view of a
//! forward looking camera so the whole control loop can run without hardware.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod render;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::*;
pub use state::*;
