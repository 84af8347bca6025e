//! # Data Store
//!
//! Holds the modules and per-cycle data of the tracking loop. One call to
//! [`DataStore::cycle`] takes a frame all the way through to a wheel demand.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use serde::Serialize;

use crate::{
    line_det::{self, LineDet},
    motor::{DriveCmd, MotorSink},
    params::TrackerExecParams,
    sim::Pose,
    steer_ctrl::SteerCtrl,
    Frame,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    // Modules
    pub line_det: LineDet,
    pub line_det_report: line_det::StatusReport,
    pub steer_ctrl: SteerCtrl,

    // Drive parameters
    pub base_speed: f64,

    /// True if the steering correction is applied with flipped polarity.
    pub mirror: bool,

    // Cycle outputs
    pub deviation: Option<f64>,
    pub steering: f64,
    pub drive_cmd: DriveCmd,

    /// The last annotated frame
    pub annotated: Option<Frame>,

    /// Pose of the simulated robot, if running in simulation
    pub sim_pose: Option<Pose>,

    // Monitoring Counters
    /// Number of consecutive cycles without a line
    pub num_consec_no_line: u64,

    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    arch: Archiver
}

/// Result of a single cycle of the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    pub deviation: Option<f64>,
    pub steering: f64,
    pub drive_cmd: DriveCmd
}

/// Flat record of a single cycle written to the archive.
#[derive(Debug, Serialize)]
struct CycleRecord {
    cycle: u64,
    elapsed_s: f64,
    deviation: Option<f64>,
    steering: f64,
    left: f64,
    right: f64,
    num_contours: usize,
    num_candidates: usize,
    line_area: Option<f64>,
    sim_x: Option<f64>,
    sim_y: Option<f64>,
    sim_theta: Option<f64>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DataStore {
    /// Create a new store from its modules.
    ///
    /// `mirror` gives the steering polarity, see [`DriveCmd::from_steering`].
    pub fn new(
        line_det: LineDet,
        steer_ctrl: SteerCtrl,
        exec_params: &TrackerExecParams,
        mirror: bool
    ) -> Self {
        Self {
            num_cycles: 0,
            line_det,
            line_det_report: line_det::StatusReport::default(),
            steer_ctrl,
            base_speed: exec_params.base_speed,
            mirror,
            deviation: None,
            steering: 0.0,
            drive_cmd: DriveCmd::stop(),
            annotated: None,
            sim_pose: None,
            num_consec_no_line: 0,
            num_consec_cycle_overruns: 0,
            arch: Archiver::default()
        }
    }

    /// Set the archiver which [`Archived::write`] records each cycle into.
    pub fn set_archiver(&mut self, arch: Archiver) {
        self.arch = arch;
    }

    /// Execute one cycle: detect the line, compute the steering, and drive the motors.
    ///
    /// If no line is found the motors are stopped and the demand is zero.
    pub fn cycle<M: MotorSink>(&mut self, frame: Option<Frame>, motors: &mut M) -> CycleOutput {
        // ---- LINE DETECTION ----

        let (det, report) = self.line_det.proc(frame);
        self.line_det_report = report;
        self.deviation = det.deviation;
        self.annotated = det.annotated;

        // ---- STEERING ----

        let (steering, _) = self.steer_ctrl.proc(self.deviation);
        self.steering = steering;

        // ---- DRIVE ----

        self.drive_cmd = match self.deviation {
            Some(_) => {
                if self.num_consec_no_line > 0 {
                    info!("Line reacquired after {} cycles", self.num_consec_no_line);
                }
                self.num_consec_no_line = 0;

                let cmd = DriveCmd::from_steering(self.base_speed, steering, self.mirror);
                motors.set_speed(cmd.left, cmd.right);
                cmd
            },
            None => {
                if self.num_consec_no_line == 0 {
                    warn!("No line detected, stopping");
                }
                self.num_consec_no_line += 1;

                motors.stop();
                DriveCmd::stop()
            }
        };

        self.num_cycles += 1;

        CycleOutput {
            deviation: self.deviation,
            steering: self.steering,
            drive_cmd: self.drive_cmd
        }
    }
}

impl Archived for DataStore {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let record = CycleRecord {
            cycle: self.num_cycles,
            elapsed_s: session::get_elapsed_seconds(),
            deviation: self.deviation,
            steering: self.steering,
            left: self.drive_cmd.left,
            right: self.drive_cmd.right,
            num_contours: self.line_det_report.num_contours,
            num_candidates: self.line_det_report.num_candidates,
            line_area: self.line_det_report.line_area,
            sim_x: self.sim_pose.map(|p| p.x),
            sim_y: self.sim_pose.map(|p| p.y),
            sim_theta: self.sim_pose.map(|p| p.theta)
        };

        self.arch.serialise(record)
    }
}
