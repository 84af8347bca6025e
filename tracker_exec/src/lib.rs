//! # Tracker library.
//!
//! Line following for a differential drive robot: a frame goes in, the dark marker line is
//! found, a PID controller turns its offset into a steering correction, and the correction is
//! mixed into left and right wheel demands. A kinematic simulator provides frames when there is
//! no hardware.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - the modules and per-cycle data of the tracking loop
pub mod data_store;

/// Raster drawing primitives used for annotation and map building
pub mod draw;

/// Frame sources - where the loop gets its images from
pub mod frame_source;

/// Line detection module - finds the marker line and its offset from the frame centre
pub mod line_det;

/// Motor interface - wheel demands and the sinks which execute them
pub mod motor;

/// Parameters for the tracker executable
pub mod params;

/// Kinematic simulator - synthesises camera frames from a virtual track
pub mod sim;

/// Steering control module - PID control of the line offset
pub mod steer_ctrl;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// An RGB image with 8 bits per channel.
pub type Frame = image::RgbImage;
