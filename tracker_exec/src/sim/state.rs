//! Implementations for the simulator state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use imageproc::point::Point;
use log::trace;
use nalgebra::Point2;
use serde::Serialize;

// Internal
use super::{render, Params};
use crate::draw::{self, BLACK, WHITE};
use crate::frame_source::FrameSource;
use crate::Frame;
use util::{maths::wrap_pi, module::State};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Pose of the simulated robot in the map.
///
/// Positions are in map pixels, the heading is measured from the map's x axis towards its y
/// axis (clockwise as displayed) and lies in (-pi, pi].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Units: pixels
    pub x: f64,

    /// Units: pixels
    pub y: f64,

    /// Units: radians
    pub theta: f64
}

/// Simulated differential drive robot with a forward looking camera.
pub struct KinematicSimulator {
    pub(super) params: Params,

    /// The track map, never modified after construction.
    pub(super) map: Frame,

    /// The map with a white border of `pad` pixels on every side.
    pub(super) padded_map: Frame,

    pub(super) pad: u32,

    pub(super) pose: Pose
}

/// Status report for simulator processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// True if the robot has left the map area.
    pub off_map: bool
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Params {
    /// Centre of the elliptical track.
    pub fn track_centre(&self) -> Point2<i32> {
        Point2::new((self.map_width / 2) as i32, (self.map_height / 2) as i32)
    }

    /// Semi-axes of the elliptical track along x and y.
    pub fn track_semi_axes(&self) -> (u32, u32) {
        (self.map_width / 3, self.map_height / 3)
    }
}

impl KinematicSimulator {
    /// Build the track map and place the robot at the top of the track facing along +x.
    pub fn new(params: Params) -> Self {
        let mut map = Frame::from_pixel(params.map_width, params.map_height, WHITE);

        let centre = params.track_centre();
        let semi_axes = params.track_semi_axes();
        draw::draw_ellipse_ring(
            &mut map,
            Point::new(centre.x, centre.y),
            semi_axes,
            BLACK,
            params.track_thickness
        );

        let pad = 2 * params.view_width.max(params.view_height);
        let padded_map = render::pad_map(&map, pad);

        let pose = Pose {
            x: centre.x as f64,
            y: (centre.y - semi_axes.1 as i32) as f64,
            theta: 0.0
        };

        Self {
            params,
            map,
            padded_map,
            pad,
            pose
        }
    }

    /// Advance the robot by one step.
    ///
    /// The wheel demands are normally between -1 and +1, but are not limited here.
    pub fn update(&mut self, left: f64, right: f64) {
        let v_l = left * self.params.max_speed;
        let v_r = right * self.params.max_speed;

        let v = (v_l + v_r) / 2.0;
        let omega = (v_r - v_l) / self.params.wheelbase;

        self.pose.x += v * self.pose.theta.cos();
        self.pose.y += v * self.pose.theta.sin();
        self.pose.theta = wrap_pi(self.pose.theta + omega);

        trace!("Sim pose: {:?}", self.pose);
    }

    /// Current pose of the robot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// The parameters the simulator was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// True if the robot is outside the map area.
    pub fn is_off_map(&self) -> bool {
        self.pose.x < 0.0
            || self.pose.y < 0.0
            || self.pose.x >= self.params.map_width as f64
            || self.pose.y >= self.params.map_height as f64
    }
}

impl Default for KinematicSimulator {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl FrameSource for KinematicSimulator {
    /// The simulator always produces a frame.
    fn get_frame(&mut self) -> Option<Frame> {
        Some(KinematicSimulator::get_frame(self))
    }

    /// Positive heading rates turn the robot towards the right of its camera image, the opposite
    /// of a physical robot whose right wheel is driven faster.
    fn is_mirrored(&self) -> bool {
        true
    }
}

impl State for KinematicSimulator {
    type Params = Params;

    /// Left and right normalised wheel demands
    type InputData = (f64, f64);
    type OutputData = Pose;
    type StatusReport = StatusReport;

    const PARAMS_FILE: &'static str = "sim.toml";

    fn from_params(params: Self::Params) -> Self {
        Self::new(params)
    }

    fn proc(&mut self, input_data: Self::InputData) -> (Self::OutputData, Self::StatusReport) {
        self.update(input_data.0, input_data.1);

        (self.pose, StatusReport {
            off_map: self.is_off_map()
        })
    }
}
