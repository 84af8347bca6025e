//! Host platform utility functions

use std::path::PathBuf;

/// Name of the environment variable pointing at the root of the software
/// checkout, which contains the `params` and `sessions` directories.
pub const SW_ROOT_ENV_VAR: &str = "TRACKER_SW_ROOT";

/// Get the root directory of the software.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Short description of the platform this executable is running on.
pub fn get_platform() -> String {
    format!(
        "{} ({}, {})",
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH
    )
}
