//! Steady-state detection.

use crate::grid::TemperatureField;

/// Outcome of one convergence check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCheck {
    /// Largest per-cell change over the step (°C)
    pub max_change: f64,
    /// Whether `max_change` fell below the tolerance
    pub converged: bool,
}

/// Declares steady state once the largest per-cell change over a step
/// drops strictly below the tolerance.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    tolerance: f64,
    last_max_change: Option<f64>,
}

impl ConvergenceMonitor {
    /// Create a monitor. A tolerance of `f64::INFINITY` converges on the first check.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            last_max_change: None,
        }
    }

    /// Largest change seen by the most recent check, if any.
    pub fn last_max_change(&self) -> Option<f64> {
        self.last_max_change
    }

    /// Compare the fields before and after a step.
    pub fn check(&mut self, before: &TemperatureField, after: &TemperatureField) -> ConvergenceCheck {
        let max_change = after.max_abs_diff(before);
        self.last_max_change = Some(max_change);
        ConvergenceCheck {
            max_change,
            converged: max_change < self.tolerance,
        }
    }
}
