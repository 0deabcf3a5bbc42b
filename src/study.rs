//! Mesh convergence study.
//!
//! Runs the same physical setup at several resolutions and reports, per
//! mesh, the steady-state time and the vertical gradient at mid-width.
//! Probe positions and the nozzle path are physical, so they carry over
//! between meshes unchanged; pins are cell indices and must fit every mesh.

use tracing::info;

use crate::config::SlabConfig;
use crate::error::Result;
use crate::solver::Simulator;

/// Result of one mesh in a study.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStudyPoint {
    pub nx: usize,
    pub nz: usize,
    /// Steady-state time (s), `None` when the time budget ran out
    pub steady_state_time: Option<f64>,
    /// Final vertical gradient at mid-width (°C/m)
    pub gradient: f64,
    /// Max change of the final step (°C)
    pub last_max_change: f64,
    /// Steps taken
    pub iterations: usize,
}

impl MeshStudyPoint {
    /// Number of grid points.
    pub fn points(&self) -> usize {
        self.nx * self.nz
    }

    /// Gradient magnitude in °C/mm, the unit studies are usually reported in.
    pub fn gradient_per_mm(&self) -> f64 {
        self.gradient.abs() * 1e-3
    }
}

/// Run `base` at every `(nx, nz)` resolution, in order.
pub fn run_mesh_study(base: &SlabConfig, meshes: &[(usize, usize)]) -> Result<Vec<MeshStudyPoint>> {
    meshes
        .iter()
        .map(|&(nx, nz)| run_mesh(base, nx, nz))
        .collect()
}

fn run_mesh(base: &SlabConfig, nx: usize, nz: usize) -> Result<MeshStudyPoint> {
    let config = base.clone().with_resolution(nx, nz)?;
    let mut sim = Simulator::new(config)?;
    let outcome = sim.run()?;

    let point = MeshStudyPoint {
        nx,
        nz,
        steady_state_time: outcome.steady_state_time(),
        gradient: sim.vertical_gradient(),
        last_max_change: sim.last_max_change().unwrap_or(0.0),
        iterations: outcome.iterations(),
    };
    info!(
        nx,
        nz,
        steady_state_time = ?point.steady_state_time,
        gradient_per_mm = point.gradient_per_mm(),
        "mesh finished"
    );
    Ok(point)
}

/// Relative change `(next - prev) / prev` between consecutive entries.
///
/// Entries where either value is missing or `prev` is zero give `None`.
pub fn relative_changes(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .windows(2)
        .map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(next)) if prev != 0.0 => Some((next - prev) / prev),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridGeometry;
    use approx::assert_relative_eq;

    #[test]
    fn test_study_keeps_physical_extents() {
        let geometry = GridGeometry::new(0.05, 0.005, 10, 5).unwrap();
        let base = SlabConfig::new(geometry, 200.0);

        let points = run_mesh_study(&base, &[(10, 5), (20, 10)]).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!((points[1].nx, points[1].nz), (20, 10));
        assert_eq!(points[1].points(), 200);
        for p in &points {
            assert!(p.steady_state_time.is_some());
            // Bed is hotter than the cooled top surface.
            assert!(p.gradient < 0.0);
            assert!(p.gradient_per_mm() < 40.0 / 5.0);
        }
    }

    #[test]
    fn test_invalid_mesh_fails() {
        let geometry = GridGeometry::new(0.05, 0.005, 10, 5).unwrap();
        let base = SlabConfig::new(geometry, 10.0);
        assert!(run_mesh_study(&base, &[(10, 5), (2, 2)]).is_err());
    }

    #[test]
    fn test_relative_changes() {
        let changes = relative_changes(&[Some(100.0), Some(110.0), None, Some(5.0)]);
        assert_eq!(changes.len(), 3);
        assert_relative_eq!(changes[0].unwrap(), 0.1, max_relative = 1e-12);
        assert!(changes[1].is_none());
        assert!(changes[2].is_none());
    }
}
