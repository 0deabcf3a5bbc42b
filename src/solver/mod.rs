//! Time integration of the heat equation.
//!
//! This module provides the numerical engine for slab simulation.
//!
//! ## Discretization
//!
//! The interior of the field obeys
//!
//! ```text
//! dT/dt = alpha (d²T/dx² + d²T/dz²)
//! ```
//!
//! discretized on the node grid with the five-point stencil. With
//! `Fo_x = alpha dt / dx²` and `Fo_z = alpha dt / dz²`:
//!
//! - [`ExplicitStepper`] applies forward Euler. Cheap, but only stable for
//!   `dt <= 0.25 min(dx², dz²) / alpha`.
//! - [`RelaxationStepper`] applies backward Euler, approximating the linear
//!   solve with a fixed number of in-place Gauss-Seidel sweeps. Stable for
//!   any `dt`.
//!
//! Edges are never touched by a stepper; [`Simulator`] re-imposes the
//! boundary conditions after every step.

mod convergence;
mod explicit;
mod relaxation;
mod simulator;

pub use convergence::{ConvergenceCheck, ConvergenceMonitor};
pub use explicit::ExplicitStepper;
pub use relaxation::RelaxationStepper;
pub use simulator::{ProbeSample, SimulationOutcome, SimulationStatus, Simulator};

use crate::error::Result;
use crate::grid::{GridGeometry, TemperatureField};

/// Default Gauss-Seidel sweeps per implicit step.
pub const DEFAULT_SWEEPS: usize = 50;

/// Default steady-state tolerance (°C per step).
pub const DEFAULT_TOLERANCE: f64 = 1.6e-2;

/// Default time step (s).
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// Simulated seconds between progress log events.
pub const PROGRESS_INTERVAL: f64 = 5.0;

/// Dimensionless diffusion numbers of one time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierNumbers {
    /// `alpha dt / dx²`
    pub x: f64,
    /// `alpha dt / dz²`
    pub z: f64,
}

impl FourierNumbers {
    pub fn new(alpha: f64, dt: f64, geometry: &GridGeometry) -> Self {
        Self {
            x: alpha * dt / (geometry.dx() * geometry.dx()),
            z: alpha * dt / (geometry.dz() * geometry.dz()),
        }
    }

    /// Sum of both numbers; the explicit stencil is stable while this is at most 0.5.
    pub fn total(&self) -> f64 {
        self.x + self.z
    }
}

/// Time integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Forward Euler
    Explicit,
    /// Backward Euler via Gauss-Seidel sweeps
    ImplicitRelaxation { sweeps: usize },
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme::ImplicitRelaxation {
            sweeps: DEFAULT_SWEEPS,
        }
    }
}

impl Scheme {
    /// Whether the scheme needs the explicit stability limit.
    pub fn is_conditionally_stable(&self) -> bool {
        matches!(self, Scheme::Explicit)
    }

    /// Short lowercase name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Explicit => "explicit",
            Scheme::ImplicitRelaxation { .. } => "implicit",
        }
    }
}

/// A stepper for either scheme.
#[derive(Debug, Clone)]
pub enum Stepper {
    Explicit(ExplicitStepper),
    Relaxation(RelaxationStepper),
}

impl Stepper {
    /// Build the stepper for a scheme.
    pub fn for_scheme(scheme: Scheme) -> Result<Self> {
        Ok(match scheme {
            Scheme::Explicit => Stepper::Explicit(ExplicitStepper::new()),
            Scheme::ImplicitRelaxation { sweeps } => {
                Stepper::Relaxation(RelaxationStepper::new(sweeps)?)
            }
        })
    }

    /// Advance the interior of `field` by one step.
    pub fn step(&mut self, field: &mut TemperatureField, fo: FourierNumbers) {
        match self {
            Stepper::Explicit(s) => s.step(field, fo),
            Stepper::Relaxation(s) => s.step(field, fo),
        }
    }

    /// Residual of the implicit equations after the last step, for the
    /// relaxation stepper only.
    pub fn residual(&self, field: &TemperatureField, fo: FourierNumbers) -> Option<f64> {
        match self {
            Stepper::Explicit(_) => None,
            Stepper::Relaxation(s) => Some(s.residual(field, fo)),
        }
    }
}
