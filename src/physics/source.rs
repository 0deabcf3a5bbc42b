//! Moving-nozzle heat source.
//!
//! Deposition is modelled as an exponential-decay mix rather than an energy
//! balance: every cell in a small window around the nozzle is pulled toward
//! the deposition temperature with a Gaussian weight of its index distance.
//!
//! ```text
//! R_eff  = max(1, round(nozzle_radius / dx))
//! sigma  = R_eff / 2
//! w      = exp(-d² / (2 sigma²))
//! T_cell = T_cell (1 - w·blend) + T_dep (w·blend)
//! ```

use crate::grid::{CellIndex, Grid, TemperatureField};

use super::path::NozzlePath;

/// Default neighbourhood half-width in cells.
pub const DEFAULT_WINDOW: usize = 3;

/// Default blend fraction per deposition.
pub const DEFAULT_BLEND_FRACTION: f64 = 0.8;

/// Default nozzle radius (0.4 mm).
pub const DEFAULT_NOZZLE_RADIUS: f64 = 0.4e-3;

/// Default temperature of freshly deposited (already cooled) filament, °C.
pub const DEFAULT_DEPOSIT_TEMPERATURE: f64 = 85.0;

/// Default nozzle height above the bed (2 mm).
pub const DEFAULT_NOZZLE_HEIGHT: f64 = 2e-3;

/// Default sweep period (s).
pub const DEFAULT_SWEEP_PERIOD: f64 = 20.0;

/// A localized heat source following a nozzle path.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatSource {
    /// Where the nozzle is at a given time
    pub path: NozzlePath,
    /// Temperature cells are blended toward (°C)
    pub deposit_temperature: f64,
    /// Physical nozzle radius (m)
    pub nozzle_radius: f64,
    /// Fraction of the way toward the deposit temperature at weight 1 (0.0 to 1.0)
    pub blend_fraction: f64,
    /// Half-width of the square neighbourhood, in cells
    pub window: usize,
    /// Time after which the nozzle stops depositing (s), `None` for never
    pub active_until: Option<f64>,
}

impl HeatSource {
    /// Create a source with the default radius, blend and window.
    pub fn new(path: NozzlePath, deposit_temperature: f64) -> Self {
        Self {
            path,
            deposit_temperature,
            nozzle_radius: DEFAULT_NOZZLE_RADIUS,
            blend_fraction: DEFAULT_BLEND_FRACTION,
            window: DEFAULT_WINDOW,
            active_until: None,
        }
    }

    /// Set the physical nozzle radius (m).
    pub fn with_nozzle_radius(mut self, radius: f64) -> Self {
        self.nozzle_radius = radius;
        self
    }

    /// Set the blend fraction.
    pub fn with_blend_fraction(mut self, blend: f64) -> Self {
        self.blend_fraction = blend;
        self
    }

    /// Set the neighbourhood half-width in cells.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Stop depositing once the simulation time passes `time`.
    pub fn with_active_until(mut self, time: f64) -> Self {
        self.active_until = Some(time);
        self
    }

    /// Whether the nozzle deposits at `time`.
    pub fn is_active(&self, time: f64) -> bool {
        self.active_until.map_or(true, |end| time < end)
    }

    /// Nozzle radius in cells, at least one.
    pub fn effective_radius(&self, dx: f64) -> f64 {
        (self.nozzle_radius / dx).round().max(1.0)
    }

    /// Gaussian width in cells.
    pub fn sigma(&self, dx: f64) -> f64 {
        self.effective_radius(dx) / 2.0
    }

    /// Gaussian weight for a squared index distance.
    pub fn weight(&self, distance_sq: f64, dx: f64) -> f64 {
        let sigma = self.sigma(dx);
        (-distance_sq / (2.0 * sigma * sigma)).exp()
    }

    /// Deposit heat at the nozzle position for simulation time `time`.
    ///
    /// Returns the nozzle cell, or `None` (and leaves the field untouched)
    /// when the nozzle is off the grid or no longer active.
    pub fn deposit(&self, grid: &mut Grid, time: f64) -> Option<CellIndex> {
        if !self.is_active(time) {
            return None;
        }
        let (x, z) = self.path.position(time);
        let center = grid.index_of(x, z)?;
        let dx = grid.dx();
        self.deposit_at(grid.field_mut(), center, dx);
        Some(center)
    }

    /// Blend the neighbourhood of `center` toward the deposit temperature.
    pub fn deposit_at(&self, field: &mut TemperatureField, center: CellIndex, dx: f64) {
        let w = self.window;
        let rows = center.row.saturating_sub(w)..=(center.row + w).min(field.nz() - 1);
        let cols = center.col.saturating_sub(w)..=(center.col + w).min(field.nx() - 1);

        for row in rows {
            for col in cols.clone() {
                let d2 = center.distance_sq(CellIndex::new(row, col)) as f64;
                let blend = self.weight(d2, dx) * self.blend_fraction;
                let cell = &mut field[(row, col)];
                *cell = *cell * (1.0 - blend) + self.deposit_temperature * blend;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridGeometry;
    use crate::physics::PathShape;
    use approx::assert_relative_eq;

    fn source(blend: f64) -> HeatSource {
        let path = NozzlePath::new(PathShape::Triangle, 4.0, 0.05, 0.0026);
        HeatSource::new(path, 85.0).with_blend_fraction(blend)
    }

    #[test]
    fn test_effective_radius() {
        let s = source(0.8);
        // 0.4 mm nozzle on a 0.25 mm mesh rounds to 2 cells.
        assert_eq!(s.effective_radius(0.25e-3), 2.0);
        // Coarse mesh never drops below one cell.
        assert_eq!(s.effective_radius(5e-3), 1.0);
        assert_relative_eq!(s.sigma(5e-3), 0.5);
    }

    #[test]
    fn test_full_blend_on_nozzle_cell() {
        let mut field = TemperatureField::uniform(11, 11, 20.0);
        let center = CellIndex::new(5, 5);
        source(1.0).deposit_at(&mut field, center, 1e-3);
        assert_relative_eq!(field.get(5, 5), 85.0);
    }

    #[test]
    fn test_partial_blend_on_nozzle_cell() {
        let mut field = TemperatureField::uniform(11, 11, 20.0);
        source(0.3).deposit_at(&mut field, CellIndex::new(5, 5), 1e-3);
        // Moves exactly blend-fraction of the way at distance zero.
        assert_relative_eq!(field.get(5, 5), 20.0 + 0.3 * 65.0, max_relative = 1e-12);
        assert!(field.get(5, 6) < field.get(5, 5));
        assert!(field.get(5, 6) > 20.0);
    }

    #[test]
    fn test_weight_vanishes_beyond_three_sigma() {
        let s = source(1.0);
        let dx = 0.1e-3; // R_eff = 4, sigma = 2
        let sigma = s.sigma(dx);
        assert_relative_eq!(sigma, 2.0);
        assert_relative_eq!(s.weight(0.0, dx), 1.0);
        let beyond = 3.0 * sigma + 0.5;
        assert!(s.weight(beyond * beyond, dx) < 0.011);
    }

    #[test]
    fn test_window_bounds_neighbourhood() {
        let mut field = TemperatureField::uniform(15, 15, 20.0);
        source(1.0).with_window(2).deposit_at(&mut field, CellIndex::new(7, 7), 1e-3);
        assert!(field.get(7, 9) > 20.0);
        assert_eq!(field.get(7, 10), 20.0);
        assert_eq!(field.get(4, 7), 20.0);
    }

    #[test]
    fn test_window_clipped_at_grid_corner() {
        let mut field = TemperatureField::uniform(5, 5, 20.0);
        source(1.0).deposit_at(&mut field, CellIndex::new(0, 0), 1e-3);
        assert_relative_eq!(field.get(0, 0), 85.0);
        assert!(field.get(1, 1) > 20.0);
    }

    #[test]
    fn test_deposit_follows_path() {
        let geometry = GridGeometry::new(0.05, 0.005, 51, 11).unwrap();
        let mut grid = Grid::new(geometry, 20.0);
        let s = source(1.0);

        // Just past a quarter period: x = 25.5 mm, z = 2.6 mm.
        let cell = s.deposit(&mut grid, 1.02).unwrap();
        assert_eq!(cell, CellIndex::new(5, 25));
        assert_relative_eq!(grid.field().get(5, 25), 85.0);
    }

    #[test]
    fn test_inactive_after_window() {
        let geometry = GridGeometry::new(0.05, 0.005, 51, 11).unwrap();
        let mut grid = Grid::new(geometry, 20.0);
        let s = source(1.0).with_active_until(1.0);

        assert!(s.is_active(0.5));
        assert!(s.deposit(&mut grid, 1.02).is_none());
        assert!(grid.field().as_slice().iter().all(|&t| t == 20.0));
    }

    #[test]
    fn test_off_grid_nozzle_is_noop() {
        let geometry = GridGeometry::new(0.05, 0.005, 51, 11).unwrap();
        let mut grid = Grid::new(geometry, 20.0);
        let mut s = source(1.0);
        s.path.height = 0.02;

        assert!(s.deposit(&mut grid, 1.0).is_none());
        assert!(grid.field().as_slice().iter().all(|&t| t == 20.0));
    }
}
