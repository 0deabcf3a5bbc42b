//! The grid: geometry plus the field living on it.

use super::field::TemperatureField;
use super::geometry::GridGeometry;
use super::types::CellIndex;

/// A temperature field together with its physical geometry.
#[derive(Debug, Clone)]
pub struct Grid {
    geometry: GridGeometry,
    field: TemperatureField,
}

impl Grid {
    /// Create a grid with every cell at `initial` degrees.
    pub fn new(geometry: GridGeometry, initial: f64) -> Self {
        let field = TemperatureField::uniform(geometry.nx(), geometry.nz(), initial);
        Self { geometry, field }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Read-only view of the field.
    pub fn field(&self) -> &TemperatureField {
        &self.field
    }

    /// Mutable view of the field.
    pub fn field_mut(&mut self) -> &mut TemperatureField {
        &mut self.field
    }

    pub fn dx(&self) -> f64 {
        self.geometry.dx()
    }

    pub fn dz(&self) -> f64 {
        self.geometry.dz()
    }

    /// Cell containing a physical position, see [`GridGeometry::index_of`].
    pub fn index_of(&self, x: f64, z: f64) -> Option<CellIndex> {
        self.geometry.index_of(x, z)
    }

    /// Temperature gradient `(T_top - T_bottom) / lz` through a column, in °C/m.
    pub fn vertical_gradient(&self, col: usize) -> f64 {
        let top = self.field.get(self.geometry.nz() - 1, col);
        let bottom = self.field.get(0, col);
        (top - bottom) / self.geometry.lz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_gradient() {
        let geometry = GridGeometry::new(0.05, 0.005, 5, 3).unwrap();
        let mut grid = Grid::new(geometry, 20.0);
        for col in 0..5 {
            grid.field_mut().set(0, col, 60.0);
            grid.field_mut().set(2, col, 40.0);
        }
        assert!((grid.vertical_gradient(2) + 4000.0).abs() < 1e-9);
    }
}
