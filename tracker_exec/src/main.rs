//! Main tracker executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Parameter tuning (reload of the line detection parameters)
//!         - Frame acquisition, from the simulator or an image directory
//!         - Line detection
//!         - Steering control
//!         - Motor demands
//!         - Simulation step (simulator only)
//!         - Archiving and diagnostic frames
//!
//! # Modules
//!
//! All modules (e.g. `line_det`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use tracker_lib::{
    data_store::DataStore,
    frame_source::{FrameSource, ImageDirSource},
    line_det::{self, LineDet},
    motor::{MockMotors, MotorSink},
    params::TrackerExecParams,
    sim::{self, KinematicSimulator},
    steer_ctrl::{self, SteerCtrl},
    Frame,
};
use util::{
    archive::{Archived, Archiver},
    host,
    logger::{logger_init, LevelFilter, LogConfig},
    module::State,
    params::{self, ParamWatcher},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "tracker_exec", about = "Marker line following executable")]
struct Opt {
    /// Run against the kinematic simulator
    #[structopt(long)]
    sim: bool,

    /// Play back the images in this directory as camera frames
    #[structopt(long, parse(from_os_str))]
    frames: Option<PathBuf>,

    /// Stop after this many cycles
    #[structopt(long)]
    max_cycles: Option<u64>,
}

/// Every parameter set loaded at start-up, saved into the session.
#[derive(Serialize)]
struct SessionParams {
    exec: TrackerExecParams,
    line_det: line_det::Params,
    steer_ctrl: steer_ctrl::Params,
    sim: Option<sim::Params>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Various sources for the frames incoming to the exec.
enum Source {
    Sim(KinematicSimulator),
    Dir(ImageDirSource),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("tracker_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_config = LogConfig {
        file_level: LevelFilter::Debug,
        stdout_level: LevelFilter::Info,
        // The simulator traces its pose every step
        module_levels: vec![("tracker_lib::sim", LevelFilter::Debug)]
    };
    logger_init(&log_config, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Tape Tracker Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: TrackerExecParams = params::load("tracker_exec.toml")
        .wrap_err("Could not load exec params")?;

    let cycle_period = exec_params
        .cycle_period()
        .wrap_err("Invalid exec params")?;

    // The line detection parameters are watched for live tuning
    let (mut line_det_watcher, line_det_params): (ParamWatcher, line_det::Params) =
        ParamWatcher::new(LineDet::PARAMS_FILE)
            .wrap_err("Could not load LineDet params")?;

    info!("Exec parameters loaded");
    info!("LineDet parameters: {:?}", line_det_params);

    // ---- INITIALISE FRAME SOURCE ----

    let mut source = match (opt.sim, &opt.frames) {
        (true, None) => {
            let s = KinematicSimulator::init()
                .wrap_err("Could not initialise the simulator")?;
            info!("Running in simulation, parameters: {:?}", s.params());
            Source::Sim(s)
        }
        (false, Some(dir)) => {
            let d = ImageDirSource::new(dir)
                .wrap_err_with(|| format!("Failed to open the frame directory {:?}", dir))?;
            info!("Playing back {} frames from {:?}", d.remaining(), dir);
            Source::Dir(d)
        }
        (true, Some(_)) => return Err(eyre!("Only one of --sim and --frames can be given")),
        (false, None) => return Err(eyre!("No frame source, use either --sim or --frames <dir>")),
    };

    // ---- INITIALISE CONTROL ----

    let steer_ctrl = SteerCtrl::init()
        .wrap_err("Failed to initialise SteerCtrl")?;
    info!("SteerCtrl parameters: {:?}", steer_ctrl.gains());

    let is_mirrored = match source {
        Source::Sim(ref s) => s.is_mirrored(),
        Source::Dir(ref d) => d.is_mirrored(),
    };

    session.save(
        "params.toml",
        SessionParams {
            exec: exec_params.clone(),
            line_det: line_det_params,
            steer_ctrl: steer_ctrl.gains(),
            sim: match source {
                Source::Sim(ref s) => Some(*s.params()),
                Source::Dir(_) => None,
            },
        },
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::new(
        LineDet::from_params(line_det_params),
        steer_ctrl,
        &exec_params,
        exec_params.mirror_steering ^ is_mirrored,
    );
    ds.set_archiver(
        Archiver::from_path(&session, "cycles.csv")
            .wrap_err("Failed to create the cycle archive")?,
    );

    let mut motors = MockMotors::new();

    info!("Module initialisation complete\n");

    // ---- SIGNAL HANDLING ----

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .wrap_err("Failed to set the Ctrl-C handler")?;
    }

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut was_off_map = false;

    while running.load(Ordering::SeqCst) {
        if let Some(max) = opt.max_cycles {
            if ds.num_cycles >= max {
                info!("Maximum number of cycles ({}) reached, stopping", max);
                break;
            }
        }

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- PARAMETER TUNING ----

        match line_det_watcher.poll::<line_det::Params>() {
            Ok(Some(p)) => {
                info!("LineDet parameters changed: {:?}", p);
                ds.line_det.set_params(p);
            }
            Ok(None) => (),
            Err(e) => warn!(
                "Could not reload {:?}, keeping the previous parameters: {}",
                line_det_watcher.path(),
                e
            ),
        }

        // ---- DATA INPUT ----

        let frame = match source {
            Source::Sim(ref mut s) => FrameSource::get_frame(s),
            Source::Dir(ref mut d) => d.get_frame(),
        };

        let frame = match frame {
            Some(f) => f,
            None => {
                info!("End of frames reached, stopping");
                break;
            }
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        let out = ds.cycle(Some(frame), &mut motors);

        // ---- SIMULATION ----

        if let Source::Sim(ref mut s) = source {
            let (pose, report) = s.proc((out.drive_cmd.left, out.drive_cmd.right));
            ds.sim_pose = Some(pose);

            if report.off_map && !was_off_map {
                warn!("Simulated robot has left the map at {:?}", pose);
            }
            was_off_map = report.off_map;
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.write() {
            warn!("Could not write the cycle archive: {}", e);
        }

        if exec_params.save_frames_every > 0
            && (ds.num_cycles - 1) % exec_params.save_frames_every == 0
        {
            let frames_dir = &session.frames_root;

            if let Some(ref annotated) = ds.annotated {
                save_frame(frames_dir, "annotated", ds.num_cycles, annotated);
            }
            if let Source::Sim(ref s) = source {
                save_frame(frames_dir, "map", ds.num_cycles, &s.get_map_with_robot());
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    motors.stop();

    info!("End of execution after {} cycles", ds.num_cycles);

    session.exit();

    Ok(())
}

/// Save a frame as a PNG in the given directory, warning on failure.
fn save_frame(dir: &Path, name: &str, cycle: u64, frame: &Frame) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("Could not create the frame directory {:?}: {}", dir, e);
        return;
    }

    let path = dir.join(format!("{}_{:06}.png", name, cycle));

    if let Err(e) = frame.save(&path) {
        warn!("Could not save frame {:?}: {}", path, e);
    }
}
