//! Module interfaces
//!
//! Each cyclic processing module in `tracker_exec` shall implement all the
//! items in this module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;

// Internal imports
use crate::params::{self, LoadError};

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
///
/// Processing is infallible: anything a module cannot act on this cycle is
/// expressed in its output or status report.
pub trait State: Sized {
    /// Parameters the module is built from.
    type Params: DeserializeOwned;

    /// Data required for cyclic processing.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;

    /// Name of the module's parameter file within the params directory.
    const PARAMS_FILE: &'static str;

    /// Build the module from already loaded parameters.
    fn from_params(params: Self::Params) -> Self;

    /// Initialise the module from its parameter file.
    fn init() -> Result<Self, LoadError> {
        params::load(Self::PARAMS_FILE).map(Self::from_params)
    }

    /// Main module processing function.
    ///
    /// # Inputs
    /// - `input_data`: The data required for processing by the module.
    ///
    /// # Outputs
    /// - A tuple of the output data and status report.
    fn proc(&mut self, input_data: Self::InputData)
        -> (Self::OutputData, Self::StatusReport);
}
