//! Grid representation.
//!
//! This module owns the temperature field and its mapping between physical
//! coordinates (meters) and cell indices. The field is a row-major
//! `nz x nx` array of temperatures; row 0 lies on the print bed.

mod field;
mod geometry;
mod mesh;
mod types;

pub use field::TemperatureField;
pub use geometry::{GridGeometry, MIN_POINTS};
pub use mesh::Grid;
pub use types::*;
