//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Watches a parameter file and reloads it whenever its modification time
/// changes.
///
/// This is the tuning surface for parameters that are allowed to change while
/// the executable is running.
pub struct ParamWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (TRACKER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$TRACKER_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    load_from_path(get_params_path(param_file_path)?)
}

/// Load a parameter file from an absolute path or one relative to the working
/// directory.
pub fn load_from_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>
{
    // Load the file into a string
    let params_str = read_to_string(path)
        .map_err(LoadError::FileLoadError)?;

    // Parse the string into the parameter struct
    toml::from_str(params_str.as_str())
        .map_err(LoadError::DeserialiseError)
}

/// Get the full path to a file in the params directory.
pub fn get_params_path(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let mut path = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    Ok(path)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ParamWatcher {
    /// Start watching the given file, which is relative to the params
    /// directory, returning the watcher and the currently stored parameters.
    pub fn new<P>(param_file_path: &str) -> Result<(Self, P), LoadError>
    where
        P: DeserializeOwned
    {
        Self::from_path(get_params_path(param_file_path)?)
    }

    /// Start watching the file at the given path.
    pub fn from_path<P, F>(path: F) -> Result<(Self, P), LoadError>
    where
        P: DeserializeOwned,
        F: AsRef<Path>
    {
        let path = path.as_ref().to_path_buf();
        let last_modified = modified_time(&path);
        let params = load_from_path(&path)?;

        Ok((Self { path, last_modified }, params))
    }

    /// Check the file for changes.
    ///
    /// Returns `Ok(Some(params))` if the file changed and was parsed,
    /// `Ok(None)` if it hasn't changed. A file which changed but can't be
    /// parsed is reported once, until it is modified again.
    pub fn poll<P>(&mut self) -> Result<Option<P>, LoadError>
    where
        P: DeserializeOwned
    {
        let modified = modified_time(&self.path);

        if modified == self.last_modified {
            return Ok(None)
        }

        self.last_modified = modified;

        load_from_path(&self.path).map(Some)
    }

    /// The path to the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestParams {
        gain: f64,
        limit: u32
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("util_params_{}_{}.toml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_path() {
        let path = temp_file("load", "gain = 0.5\nlimit = 10\n");

        let params: TestParams = load_from_path(&path).unwrap();
        assert_eq!(params, TestParams { gain: 0.5, limit: 10 });

        std::fs::write(&path, "gain = \"oops\"\n").unwrap();
        assert!(matches!(
            load_from_path::<TestParams, _>(&path),
            Err(LoadError::DeserialiseError(_))
        ));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            load_from_path::<TestParams, _>(&path),
            Err(LoadError::FileLoadError(_))
        ));
    }

    #[test]
    fn test_watcher_unchanged() {
        let path = temp_file("watch", "gain = 1.0\nlimit = 2\n");

        let (mut watcher, params): (ParamWatcher, TestParams) =
            ParamWatcher::from_path(&path).unwrap();
        assert_eq!(params.limit, 2);

        // Nothing has touched the file since it was loaded
        assert_eq!(watcher.poll::<TestParams>().unwrap(), None);
        assert_eq!(watcher.path(), path.as_path());

        std::fs::remove_file(&path).unwrap();
    }
}
