//! Session management
//!
//! Every run of an executable gets its own directory under
//! `$TRACKER_SW_ROOT/<sessions_dir>/<exec>_<timestamp>/`, holding the log
//! file, the CSV archives in `arch/`, diagnostic images in `frames/`, and any
//! snapshots passed to [`Session::save`]. Snapshots are written by a
//! background thread so the tracking loop never waits on the disk.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Timestamp appended to the session directory name, see `chrono::format::strftime`.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive directory within a session.
const ARCH_DIR: &str = "arch";

/// Name of the diagnostic image directory within a session.
const FRAMES_DIR: &str = "frames";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Snapshot request handled by the save thread.
type Snapshot = (PathBuf, Box<dyn Serialize + Send>);

/// The directories of the current run and the handle to its save thread.
pub struct Session {
    /// Directory holding everything produced by this run
    pub session_root: PathBuf,

    /// Directory for CSV archives
    pub arch_root: PathBuf,

    /// Directory for diagnostic images, created when first written to
    pub frames_root: PathBuf,

    /// Log file of this run
    pub log_file_path: PathBuf,

    /// Dropping the sender ends the save thread once its queue is empty.
    snapshot_tx: Option<Sender<Snapshot>>,

    save_jh: Option<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while starting a session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (TRACKER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process ({0})")]
    CannotInitEpoch(conquer_once::TryInitError),
}

/// Errors raised while writing a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshots are written as .json or .toml, found {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Cannot write the snapshot file: {0}")]
    Io(std::io::Error),

    #[error("Cannot serialise the snapshot as JSON: {0}")]
    Json(serde_json::Error),

    #[error("Cannot serialise the snapshot as TOML: {0}")]
    Toml(toml::ser::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session for `exec_name` inside `$TRACKER_SW_ROOT/<sessions_dir>`.
    ///
    /// Only one session may be started per process, its start time is the
    /// epoch of every log and archive timestamp.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        let session_root = root
            .join(sessions_dir)
            .join(session_dir_name(exec_name, get_epoch()));
        let arch_root = session_root.join(ARCH_DIR);

        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        let (tx, rx) = mpsc::channel();
        let thread_root = session_root.clone();
        let save_jh = thread::spawn(move || save_thread(&thread_root, rx));

        Ok(Session {
            frames_root: session_root.join(FRAMES_DIR),
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            arch_root,
            session_root,
            snapshot_tx: Some(tx),
            save_jh: Some(save_jh),
        })
    }

    /// Queue `data` to be written to `path`, relative to the session root.
    ///
    /// The format follows the extension, `.json` or `.toml`. Failures are
    /// logged by the save thread.
    pub fn save<P: AsRef<Path>, T: Serialize + Send + 'static>(&self, path: P, data: T) {
        let sent = match self.snapshot_tx {
            Some(ref tx) => tx.send((path.as_ref().to_path_buf(), Box::new(data))).is_ok(),
            None => false,
        };

        if !sent {
            warn!("Save thread is not running, {:?} was not saved", path.as_ref());
        }
    }

    /// End the session, blocking until every queued snapshot is written.
    pub fn exit(mut self) {
        info!("Flushing session snapshots");

        self.snapshot_tx = None;

        if let Some(jh) = self.save_jh.take() {
            if jh.join().is_err() {
                warn!("Save thread panicked");
            }
        }

        info!("Session closed");
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Seconds since the session started, `NAN` before it has.
pub fn get_elapsed_seconds() -> f64 {
    SESSION_EPOCH
        .get()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(std::f64::NAN)
}

/// The session's start time.
///
/// # Panics
/// - If no session has been started.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

/// Write a snapshot to `path` immediately, creating its parent directories.
pub fn write_snapshot(path: &Path, data: &(dyn Serialize + Send)) -> Result<(), SnapshotError> {
    let contents = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::to_string_pretty(data).map_err(SnapshotError::Json)?,
        Some("toml") => toml::to_string_pretty(data).map_err(SnapshotError::Toml)?,
        _ => return Err(SnapshotError::UnsupportedFormat(path.to_path_buf())),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(SnapshotError::Io)?;
    }

    fs::write(path, contents).map_err(SnapshotError::Io)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn session_dir_name(exec_name: &str, epoch: &DateTime<Utc>) -> String {
    format!("{}_{}", exec_name, epoch.format(TIMESTAMP_FORMAT))
}

fn save_thread(session_root: &Path, rx: Receiver<Snapshot>) {
    for (path, data) in rx {
        let full_path = session_root.join(&path);

        match write_snapshot(&full_path, data.as_ref()) {
            Ok(()) => debug!("Saved {:?}", full_path),
            Err(e) => warn!("Could not save {:?}: {}", full_path, e),
        }
    }
}
