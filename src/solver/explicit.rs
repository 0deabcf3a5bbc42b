//! Forward-Euler (explicit) diffusion step.

use crate::grid::TemperatureField;

use super::FourierNumbers;

/// Explicit five-point stencil.
///
/// Every interior cell is updated from the pre-step values only:
///
/// ```text
/// T'[i,j] = T[i,j] + Fo_x (T[i,j+1] - 2T[i,j] + T[i,j-1])
///                  + Fo_z (T[i+1,j] - 2T[i,j] + T[i-1,j])
/// ```
///
/// Stable only while `dt <= 0.25 * min(dx², dz²) / alpha`. The stepper does
/// not check this; [`Simulator`](super::Simulator) does at construction.
#[derive(Debug, Clone)]
pub struct ExplicitStepper {
    /// Pre-step copy of the field
    old: TemperatureField,
}

impl Default for ExplicitStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplicitStepper {
    pub fn new() -> Self {
        Self {
            old: TemperatureField::uniform(0, 0, 0.0),
        }
    }

    /// Advance the interior of `field` by one time step. Edges are untouched.
    pub fn step(&mut self, field: &mut TemperatureField, fo: FourierNumbers) {
        self.old.copy_from(field);
        let old = &self.old;

        let (nx, nz) = (field.nx(), field.nz());
        for i in 1..nz - 1 {
            for j in 1..nx - 1 {
                let c = old[(i, j)];
                let d2x = old[(i, j + 1)] - 2.0 * c + old[(i, j - 1)];
                let d2z = old[(i + 1, j)] - 2.0 * c + old[(i - 1, j)];
                field[(i, j)] = c + fo.x * d2x + fo.z * d2z;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_field_is_fixed_point() {
        let mut field = TemperatureField::uniform(6, 5, 42.0);
        let mut stepper = ExplicitStepper::new();
        stepper.step(&mut field, FourierNumbers { x: 0.1, z: 0.2 });
        assert!(field.as_slice().iter().all(|&t| t == 42.0));
    }

    #[test]
    fn test_single_hot_cell() {
        let mut field = TemperatureField::uniform(5, 5, 0.0);
        field.set(2, 2, 100.0);
        let fo = FourierNumbers { x: 0.1, z: 0.15 };

        ExplicitStepper::new().step(&mut field, fo);

        let center = 100.0 * (1.0 - 2.0 * 0.1 - 2.0 * 0.15);
        assert_relative_eq!(field.get(2, 2), center, max_relative = 1e-12);
        assert_relative_eq!(field.get(2, 1), 10.0, max_relative = 1e-12);
        assert_relative_eq!(field.get(2, 3), 10.0, max_relative = 1e-12);
        assert_relative_eq!(field.get(1, 2), 15.0, max_relative = 1e-12);
        assert_relative_eq!(field.get(3, 2), 15.0, max_relative = 1e-12);
        // Diagonals read only old values, so stay cold after one step.
        assert_eq!(field.get(1, 1), 0.0);
    }

    #[test]
    fn test_edges_untouched() {
        let mut field = TemperatureField::uniform(4, 4, 20.0);
        for col in 0..4 {
            field.set(0, col, 60.0);
        }
        ExplicitStepper::new().step(&mut field, FourierNumbers { x: 0.2, z: 0.2 });
        assert_eq!(field.row(0), &[60.0; 4]);
        assert_eq!(field.row(3), &[20.0; 4]);
        assert_eq!(field.get(1, 0), 20.0);
        assert!(field.get(1, 1) > 20.0);
    }
}
