//! # Steering control module
//!
//! PID controller turning the line deviation into a steering correction.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::*;
pub use state::*;
