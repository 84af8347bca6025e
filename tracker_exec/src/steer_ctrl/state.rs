//! Implementations for the SteerCtrl state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::Params;
use util::module::State;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A discrete PID controller stepped once per cycle.
///
/// There is no output clamping and no integral windup protection.
#[derive(Debug, Clone, Serialize)]
pub struct SteerCtrl {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Error passed in on the last compute, zero before the first
    prev_error: f64,

    /// Sum of all errors passed in
    integral: f64
}

/// Status report for SteerCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// True if there was no error to act on this cycle.
    pub skipped: bool,

    /// Integral term after this cycle.
    pub integral: f64
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl SteerCtrl {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            prev_error: 0.0,
            integral: 0.0
        }
    }

    /// Get the steering correction for the given error.
    ///
    /// If there is no error the correction is zero and the controller's state is left untouched.
    pub fn compute(&mut self, error: Option<f64>) -> f64 {
        let error = match error {
            Some(e) => e,
            None => return 0.0
        };

        self.integral += error;
        let deriv = error - self.prev_error;

        let out = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        self.prev_error = error;

        trace!(
            "SteerCtrl: error = {:.4}, integral = {:.4}, deriv = {:.4}, out = {:.4}",
            error, self.integral, deriv, out
        );

        out
    }

    /// The gains of the controller as a parameter set.
    pub fn gains(&self) -> Params {
        Params {
            k_p: self.k_p,
            k_i: self.k_i,
            k_d: self.k_d
        }
    }

    /// Sum of all errors computed so far.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// The last error computed, zero before the first.
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

impl Default for SteerCtrl {
    fn default() -> Self {
        Self::from_params(Params::default())
    }
}

impl State for SteerCtrl {
    type Params = Params;

    type InputData = Option<f64>;
    type OutputData = f64;
    type StatusReport = StatusReport;

    const PARAMS_FILE: &'static str = "steer_ctrl.toml";

    fn from_params(params: Self::Params) -> Self {
        Self::new(params.k_p, params.k_i, params.k_d)
    }

    fn proc(&mut self, input_data: Self::InputData) -> (Self::OutputData, Self::StatusReport) {
        let out = self.compute(input_data);

        (out, StatusReport {
            skipped: input_data.is_none(),
            integral: self.integral
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proportional() {
        let mut ctrl = SteerCtrl::new(2.0, 0.0, 0.0);
        assert_eq!(ctrl.compute(Some(0.25)), 0.5);
        assert_eq!(ctrl.compute(Some(-0.5)), -1.0);
    }

    #[test]
    fn test_integral() {
        let mut ctrl = SteerCtrl::new(0.0, 0.5, 0.0);
        let errors = [0.5, 0.25, -0.125, 1.0];

        let mut out = 0.0;
        for e in errors.iter() {
            out = ctrl.compute(Some(*e));
        }

        let sum: f64 = errors.iter().sum();
        assert!((out - 0.5 * sum).abs() < 1e-12);
        assert!((ctrl.integral() - sum).abs() < 1e-12);
    }

    #[test]
    fn test_derivative() {
        let mut ctrl = SteerCtrl::new(0.0, 0.0, 0.5);

        // The first derivative is taken from zero
        assert_eq!(ctrl.compute(Some(0.5)), 0.25);
        assert_eq!(ctrl.compute(Some(-0.25)), 0.5 * (-0.25 - 0.5));
        assert_eq!(ctrl.prev_error(), -0.25);
    }

    #[test]
    fn test_no_error() {
        let mut ctrl = SteerCtrl::new(1.0, 1.0, 1.0);
        ctrl.compute(Some(0.5));
        let (integral, prev_error) = (ctrl.integral(), ctrl.prev_error());

        assert_eq!(ctrl.compute(None), 0.0);
        assert_eq!(ctrl.integral(), integral);
        assert_eq!(ctrl.prev_error(), prev_error);

        // The next error continues from the state before the gap
        assert_eq!(ctrl.compute(Some(0.5)), 0.5 + 1.0 + 0.0);
    }

    #[test]
    fn test_proc() {
        let mut ctrl = SteerCtrl::default();

        assert_eq!(ctrl.gains(), Params::default());

        let (out, report) = ctrl.proc(None);
        assert_eq!(out, 0.0);
        assert!(report.skipped);

        let (out, report) = ctrl.proc(Some(0.2));
        assert!((out - (0.5 * 0.2 + 0.1 * 0.2)).abs() < 1e-12);
        assert!(!report.skipped);
        assert_eq!(report.integral, 0.2);
    }
}
