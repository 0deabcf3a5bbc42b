//! Backward-Euler (implicit) diffusion step solved by relaxation.

use crate::error::{Result, SlabError};
use crate::grid::TemperatureField;

use super::FourierNumbers;

/// Implicit stepper approximated by a fixed number of Gauss-Seidel sweeps.
///
/// Each interior cell of the new field satisfies
///
/// ```text
/// T'[i,j] (1 + 2Fo_x + 2Fo_z) = T[i,j] + Fo_x (T'[i,j+1] + T'[i,j-1])
///                                      + Fo_z (T'[i+1,j] + T'[i-1,j])
/// ```
///
/// Sweeps update the field in place, row by row, so a cell reads neighbours
/// already refreshed earlier in the same sweep. This is Gauss-Seidel, not
/// Jacobi; changing the update order changes the result of a finite number
/// of sweeps. More sweeps approach the exact implicit solution at a fixed
/// cost per step. Unconditionally stable.
#[derive(Debug, Clone)]
pub struct RelaxationStepper {
    /// Number of sweeps per time step
    sweeps: usize,
    /// Pre-step field (right-hand side of the implicit system)
    old: TemperatureField,
}

impl RelaxationStepper {
    /// Create a relaxation stepper. At least one sweep is required.
    pub fn new(sweeps: usize) -> Result<Self> {
        if sweeps == 0 {
            return Err(SlabError::invalid_param(
                "relaxation needs at least one sweep per step",
            ));
        }
        Ok(Self {
            sweeps,
            old: TemperatureField::uniform(0, 0, 0.0),
        })
    }

    /// Sweeps performed per step.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Advance the interior of `field` by one time step. Edges are untouched.
    pub fn step(&mut self, field: &mut TemperatureField, fo: FourierNumbers) {
        self.old.copy_from(field);

        let (nx, nz) = (field.nx(), field.nz());
        let center = 1.0 + 2.0 * fo.x + 2.0 * fo.z;

        for _ in 0..self.sweeps {
            for i in 1..nz - 1 {
                for j in 1..nx - 1 {
                    let horizontal = field[(i, j + 1)] + field[(i, j - 1)];
                    let vertical = field[(i + 1, j)] + field[(i - 1, j)];
                    field[(i, j)] =
                        (self.old[(i, j)] + fo.x * horizontal + fo.z * vertical) / center;
                }
            }
        }
    }

    /// Largest residual of the implicit equations for `field` against the
    /// pre-step field of the last call to [`step`](Self::step).
    pub fn residual(&self, field: &TemperatureField, fo: FourierNumbers) -> f64 {
        let (nx, nz) = (field.nx(), field.nz());
        let center = 1.0 + 2.0 * fo.x + 2.0 * fo.z;
        let mut max_residual = 0.0f64;

        for i in 1..nz - 1 {
            for j in 1..nx - 1 {
                let horizontal = field[(i, j + 1)] + field[(i, j - 1)];
                let vertical = field[(i + 1, j)] + field[(i - 1, j)];
                let r = field[(i, j)] * center
                    - self.old[(i, j)]
                    - fo.x * horizontal
                    - fo.z * vertical;
                max_residual = max_residual.max(r.abs());
            }
        }
        max_residual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hot_bottom(nx: usize, nz: usize) -> TemperatureField {
        let mut field = TemperatureField::uniform(nx, nz, 20.0);
        for col in 0..nx {
            field.set(0, col, 60.0);
        }
        field
    }

    #[test]
    fn test_rejects_zero_sweeps() {
        assert!(RelaxationStepper::new(0).is_err());
        assert_eq!(RelaxationStepper::new(3).unwrap().sweeps(), 3);
    }

    #[test]
    fn test_uses_updated_neighbours_within_sweep() {
        // 3 interior cells in one column: Gauss-Seidel carries the hot bed
        // value up to the top interior cell in a single sweep.
        let mut field = hot_bottom(3, 5);
        let fo = FourierNumbers { x: 0.0, z: 1.0 };
        RelaxationStepper::new(1).unwrap().step(&mut field, fo);

        let t1 = (20.0 + 60.0 + 20.0) / 3.0;
        let t2 = (20.0 + t1 + 20.0) / 3.0;
        let t3 = (20.0 + t2 + 20.0) / 3.0;
        assert_relative_eq!(field.get(1, 1), t1, max_relative = 1e-12);
        assert_relative_eq!(field.get(2, 1), t2, max_relative = 1e-12);
        assert_relative_eq!(field.get(3, 1), t3, max_relative = 1e-12);
    }

    #[test]
    fn test_more_sweeps_reduce_residual() {
        let fo = FourierNumbers { x: 0.5, z: 2.0 };

        let mut few = hot_bottom(8, 8);
        let mut stepper_few = RelaxationStepper::new(2).unwrap();
        stepper_few.step(&mut few, fo);

        let mut many = hot_bottom(8, 8);
        let mut stepper_many = RelaxationStepper::new(60).unwrap();
        stepper_many.step(&mut many, fo);

        let r_few = stepper_few.residual(&few, fo);
        let r_many = stepper_many.residual(&many, fo);
        assert!(r_many < r_few);
        assert!(r_many < 1e-6);
    }

    #[test]
    fn test_large_fourier_number_stays_bounded() {
        let mut field = hot_bottom(10, 10);
        let mut stepper = RelaxationStepper::new(5).unwrap();
        let fo = FourierNumbers { x: 500.0, z: 500.0 };
        for _ in 0..50 {
            stepper.step(&mut field, fo);
        }
        assert!(field.max() <= 60.0 + 1e-9);
        assert!(field.min() >= 20.0 - 1e-9);
    }
}
