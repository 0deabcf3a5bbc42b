//! Physical models acting on the temperature field.
//!
//! This module provides:
//! - Material: bulk thermal properties and diffusivity
//! - Boundary: per-edge Dirichlet / convective / adiabatic conditions with pins
//! - Path: periodic nozzle trajectories
//! - Source: the moving Gaussian deposition model

mod boundary;
mod material;
mod path;
mod source;

pub use boundary::{convective_temperature, BoundaryCondition, BoundarySet, EdgePolicy, Pin};
pub use material::MaterialProperties;
pub use path::{NozzlePath, PathShape};
pub use source::{
    HeatSource, DEFAULT_BLEND_FRACTION, DEFAULT_DEPOSIT_TEMPERATURE, DEFAULT_NOZZLE_HEIGHT,
    DEFAULT_NOZZLE_RADIUS, DEFAULT_SWEEP_PERIOD, DEFAULT_WINDOW,
};
