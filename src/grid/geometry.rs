//! Physical extents and physical-to-index mapping.

use crate::error::{Result, SlabError};

use super::types::CellIndex;

/// Smallest resolution admitting an interior point in each direction.
pub const MIN_POINTS: usize = 3;

/// Physical extents and resolution of the slab.
///
/// Spacing is node-to-node: `dx = lx / (nx - 1)`, `dz = lz / (nz - 1)`,
/// so column 0 sits at `x = 0` and column `nx - 1` at `x = lx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    lx: f64,
    lz: f64,
    nx: usize,
    nz: usize,
    dx: f64,
    dz: f64,
}

impl GridGeometry {
    /// Create a validated geometry.
    ///
    /// # Arguments
    /// * `lx`, `lz` - Slab width and height in meters
    /// * `nx`, `nz` - Number of grid points along x and z (each at least 3)
    pub fn new(lx: f64, lz: f64, nx: usize, nz: usize) -> Result<Self> {
        if nx < MIN_POINTS || nz < MIN_POINTS {
            return Err(SlabError::GridTooSmall { nx, nz });
        }
        if !(lx.is_finite() && lx > 0.0) {
            return Err(SlabError::invalid_geometry(format!(
                "width lx must be positive, got {}",
                lx
            )));
        }
        if !(lz.is_finite() && lz > 0.0) {
            return Err(SlabError::invalid_geometry(format!(
                "height lz must be positive, got {}",
                lz
            )));
        }

        Ok(Self {
            lx,
            lz,
            nx,
            nz,
            dx: lx / (nx - 1) as f64,
            dz: lz / (nz - 1) as f64,
        })
    }

    /// Same physical extents at a different resolution.
    pub fn with_resolution(&self, nx: usize, nz: usize) -> Result<Self> {
        Self::new(self.lx, self.lz, nx, nz)
    }

    pub fn lx(&self) -> f64 {
        self.lx
    }

    pub fn lz(&self) -> f64 {
        self.lz
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Cell spacing along x (m).
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell spacing along z (m).
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.nz
    }

    /// Physical x coordinate of a column.
    pub fn x_of(&self, col: usize) -> f64 {
        col as f64 * self.dx
    }

    /// Physical z coordinate of a row.
    pub fn z_of(&self, row: usize) -> f64 {
        row as f64 * self.dz
    }

    /// Map a physical position to the cell containing it.
    ///
    /// Uses `floor(position / spacing)` on each axis. Returns `None` when
    /// either coordinate is negative or non-finite, or when its index would
    /// fall outside `0..n`. There is no clamping: `x = lx` maps to column
    /// `nx - 1`, anything at or beyond `lx + dx` is off the grid.
    pub fn index_of(&self, x: f64, z: f64) -> Option<CellIndex> {
        let col = Self::axis_index(x, self.dx, self.nx)?;
        let row = Self::axis_index(z, self.dz, self.nz)?;
        Some(CellIndex::new(row, col))
    }

    fn axis_index(position: f64, spacing: f64, n: usize) -> Option<usize> {
        if !position.is_finite() || position < 0.0 {
            return None;
        }
        let index = (position / spacing).floor();
        if index < n as f64 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Largest explicit-scheme time step for a diffusivity: `0.25 * min(dx², dz²) / alpha`.
    pub fn stable_time_step(&self, diffusivity: f64) -> f64 {
        0.25 * (self.dx * self.dx).min(self.dz * self.dz) / diffusivity
    }
}
