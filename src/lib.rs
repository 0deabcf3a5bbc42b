//! # Thermoslab
//!
//! Transient 2D heat conduction through a printed part on a heated bed.
//!
//! This library provides:
//! - A finite-difference temperature field on a rectangular x-z slab
//! - Explicit (forward Euler) and implicit (Gauss-Seidel relaxed backward
//!   Euler) time stepping
//! - Dirichlet, convective and adiabatic edges with per-cell pins
//! - A moving nozzle depositing heat along a periodic path
//! - Steady-state detection, probes and mesh convergence studies
//! - A small text language for describing a run
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the slab description language
//! - [`config`] - Run configuration and its construction from a description
//! - [`grid`] - Geometry, index mapping and the temperature field
//! - [`physics`] - Material, boundary conditions and the heat source
//! - [`solver`] - Steppers, convergence monitor and the simulation driver
//! - [`study`] - Mesh convergence sweeps
//! - [`output`] - CSV output (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! thermoslab part.slab --field > field.csv
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use thermoslab::{GridGeometry, SlabConfig, Simulator};
//!
//! let geometry = GridGeometry::new(0.05, 0.005, 20, 10)?;
//! let mut sim = Simulator::new(SlabConfig::new(geometry, 100.0))?;
//! let outcome = sim.run()?;
//! println!("{:?}, gradient {} °C/m", outcome, sim.vertical_gradient());
//! # Ok::<(), thermoslab::SlabError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmSlabSim } from 'thermoslab';
//!
//! const sim = new WasmSlabSim(slabDsl);
//! sim.run_steps(100);
//! ```
//!
//! ## Simulation Method
//!
//! For each time step:
//!
//! 1. Blend the cells around the nozzle toward the deposition temperature
//! 2. Update the interior with the five-point diffusion stencil
//! 3. Rewrite the edges from their boundary conditions
//! 4. Compare with the field before the step to detect steady state

pub mod config;
pub mod dsl;
pub mod error;
pub mod grid;
pub mod physics;
pub mod solver;
pub mod study;

#[cfg(feature = "cli")]
pub mod output;

// Re-export main types for convenience
pub use config::{ProbeConfig, SlabConfig, TimeStep};
pub use error::{Result, SlabError};
pub use grid::{CellIndex, Edge, Grid, GridGeometry, TemperatureField};
pub use physics::{BoundaryCondition, BoundarySet, HeatSource, MaterialProperties, NozzlePath, PathShape};
pub use solver::{Scheme, SimulationOutcome, SimulationStatus, Simulator};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmSlabSim;
