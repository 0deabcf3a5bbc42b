//! Temperature field storage.

use std::ops::{Index, IndexMut};

use super::types::CellIndex;

/// A 2D temperature field in degrees Celsius.
///
/// Stored row-major with `nz` rows (z direction, row 0 at the bed) and
/// `nx` columns (x direction). Indexing uses `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField {
    nx: usize,
    nz: usize,
    data: Vec<f64>,
}

impl TemperatureField {
    /// Create a field with every cell at `value`.
    pub fn uniform(nx: usize, nz: usize, value: f64) -> Self {
        Self {
            nx,
            nz,
            data: vec![value; nx * nz],
        }
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Temperature at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.nx + col]
    }

    /// Set the temperature at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.nx + col] = value;
    }

    /// Temperature at a cell index, or `None` outside the field.
    pub fn at(&self, cell: CellIndex) -> Option<f64> {
        if cell.row < self.nz && cell.col < self.nx {
            Some(self.get(cell.row, cell.col))
        } else {
            None
        }
    }

    /// One row (constant z) of the field.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.nx..(row + 1) * self.nx]
    }

    /// One column (constant x) of the field, bottom to top.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.nz).map(|row| self.get(row, col)).collect()
    }

    /// Row-major view of all cells.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Overwrite this field with the contents of another, taking its shape.
    ///
    /// Reuses the existing allocation when the shapes already match.
    pub fn copy_from(&mut self, other: &TemperatureField) {
        if self.data.len() == other.data.len() {
            self.data.copy_from_slice(&other.data);
        } else {
            self.data.clear();
            self.data.extend_from_slice(&other.data);
        }
        self.nx = other.nx;
        self.nz = other.nz;
    }

    /// Largest absolute per-cell difference to another field of the same shape.
    pub fn max_abs_diff(&self, other: &TemperatureField) -> f64 {
        debug_assert_eq!((self.nx, self.nz), (other.nx, other.nz));
        self.data
            .iter()
            .zip(&other.data)
            .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()))
    }

    /// Smallest temperature in the field.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest temperature in the field.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean temperature over all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// First cell (row-major order) holding NaN or an infinity.
    pub fn first_non_finite(&self) -> Option<(CellIndex, f64)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| (CellIndex::new(i / self.nx, i % self.nx), self.data[i]))
    }
}

impl Index<(usize, usize)> for TemperatureField {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.nx + col]
    }
}

impl IndexMut<(usize, usize)> for TemperatureField {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.nx + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut field = TemperatureField::uniform(4, 3, 20.0);
        field[(1, 2)] = 35.0;
        assert_eq!(field.as_slice()[4 + 2], 35.0);
        assert_eq!(field.row(1), &[20.0, 20.0, 35.0, 20.0]);
        assert_eq!(field.column(2), vec![20.0, 35.0, 20.0]);
        assert_eq!(field.at(CellIndex::new(1, 2)), Some(35.0));
        assert_eq!(field.at(CellIndex::new(3, 0)), None);
    }

    #[test]
    fn test_statistics() {
        let mut field = TemperatureField::uniform(3, 3, 20.0);
        field.set(0, 0, 60.0);
        field.set(2, 2, 11.0);
        assert_eq!(field.max(), 60.0);
        assert_eq!(field.min(), 11.0);
        assert!((field.mean() - (7.0 * 20.0 + 71.0) / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = TemperatureField::uniform(3, 3, 20.0);
        let mut b = a.clone();
        b.set(1, 1, 18.5);
        b.set(2, 0, 20.25);
        assert_eq!(a.max_abs_diff(&b), 1.5);
        assert_eq!(a.max_abs_diff(&a), 0.0);
    }

    #[test]
    fn test_copy_from_takes_shape() {
        let source = TemperatureField::uniform(4, 3, 55.0);
        let mut target = TemperatureField::uniform(0, 0, 0.0);
        target.copy_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_first_non_finite() {
        let mut field = TemperatureField::uniform(3, 3, 20.0);
        assert!(field.first_non_finite().is_none());
        field.set(2, 1, f64::NAN);
        let (cell, value) = field.first_non_finite().unwrap();
        assert_eq!(cell, CellIndex::new(2, 1));
        assert!(value.is_nan());
    }
}
