//! Boundary conditions and their enforcement on the field edges.
//!
//! After every diffusion update the edge rows and columns are rewritten from
//! the declared per-edge policy. Edges are processed bottom, top, left,
//! right; the side columns span every row, so corners end up owned by the
//! sides (last writer wins) and an adiabatic side copies an already-corrected
//! top or bottom neighbour.

use crate::error::{Result, SlabError};
use crate::grid::{CellIndex, Edge, GridGeometry, TemperatureField};

/// Boundary condition kind for one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Fixed temperature (°C).
    Dirichlet(f64),
    /// Conduction to the edge balanced against convection to an ambient medium.
    Convective {
        /// Heat transfer coefficient (W/(m²·K))
        h: f64,
        /// Ambient temperature (°C)
        ambient: f64,
    },
    /// Zero normal gradient: the edge copies its interior neighbour.
    Adiabatic,
}

impl BoundaryCondition {
    fn validate(&self, edge: Edge) -> Result<()> {
        match *self {
            BoundaryCondition::Dirichlet(value) if !value.is_finite() => {
                Err(invalid(edge, format!("fixed temperature must be finite, got {}", value)))
            }
            BoundaryCondition::Convective { h, ambient } => {
                if !(h.is_finite() && h >= 0.0) {
                    return Err(invalid(
                        edge,
                        format!("heat transfer coefficient must be non-negative, got {}", h),
                    ));
                }
                if !ambient.is_finite() {
                    return Err(invalid(
                        edge,
                        format!("ambient temperature must be finite, got {}", ambient),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Temperature this condition imposes from outside the slab, if any.
    fn imposed_temperature(&self) -> Option<f64> {
        match *self {
            BoundaryCondition::Dirichlet(value) => Some(value),
            BoundaryCondition::Convective { ambient, .. } => Some(ambient),
            BoundaryCondition::Adiabatic => None,
        }
    }
}

/// A single edge cell held at a fixed temperature (e.g. a heater element).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Position along the edge: column for bottom/top, row for left/right
    pub index: usize,
    /// Fixed temperature (°C)
    pub value: f64,
}

/// Uniform condition for an edge plus any per-cell pins overriding it.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePolicy {
    pub condition: BoundaryCondition,
    pub pins: Vec<Pin>,
}

impl EdgePolicy {
    /// An edge policy without pins.
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self {
            condition,
            pins: Vec::new(),
        }
    }
}

/// Boundary policies for all four edges.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySet {
    bottom: EdgePolicy,
    top: EdgePolicy,
    left: EdgePolicy,
    right: EdgePolicy,
}

impl Default for BoundarySet {
    /// Part on a 60 °C bed, top cooled by still air (h = 50, 20 °C), adiabatic sides.
    fn default() -> Self {
        Self::heated_bed(60.0, 50.0, 20.0)
    }
}

impl BoundarySet {
    /// Create a boundary set with one uniform condition per edge.
    pub fn new(
        bottom: BoundaryCondition,
        top: BoundaryCondition,
        left: BoundaryCondition,
        right: BoundaryCondition,
    ) -> Self {
        Self {
            bottom: EdgePolicy::uniform(bottom),
            top: EdgePolicy::uniform(top),
            left: EdgePolicy::uniform(left),
            right: EdgePolicy::uniform(right),
        }
    }

    /// The usual printing setup: Dirichlet bed, convective top, adiabatic sides.
    pub fn heated_bed(bed_temperature: f64, h: f64, ambient: f64) -> Self {
        Self::new(
            BoundaryCondition::Dirichlet(bed_temperature),
            BoundaryCondition::Convective { h, ambient },
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Adiabatic,
        )
    }

    /// Replace the uniform condition on one edge, keeping its pins.
    pub fn with_edge(mut self, edge: Edge, condition: BoundaryCondition) -> Self {
        self.edge_mut(edge).condition = condition;
        self
    }

    /// Hold one edge cell at a fixed temperature.
    pub fn with_pin(mut self, edge: Edge, index: usize, value: f64) -> Self {
        self.edge_mut(edge).pins.push(Pin { index, value });
        self
    }

    /// Policy for an edge.
    pub fn edge(&self, edge: Edge) -> &EdgePolicy {
        match edge {
            Edge::Bottom => &self.bottom,
            Edge::Top => &self.top,
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }

    fn edge_mut(&mut self, edge: Edge) -> &mut EdgePolicy {
        match edge {
            Edge::Bottom => &mut self.bottom,
            Edge::Top => &mut self.top,
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
        }
    }

    /// Check values and that every pin lies on its edge.
    pub fn validate(&self, geometry: &GridGeometry) -> Result<()> {
        for edge in Edge::ENFORCEMENT_ORDER {
            let policy = self.edge(edge);
            policy.condition.validate(edge)?;

            let len = edge_len(edge, geometry.nx(), geometry.nz());
            for pin in &policy.pins {
                if pin.index >= len {
                    return Err(invalid(
                        edge,
                        format!("pin index {} is outside 0..{}", pin.index, len),
                    ));
                }
                if !pin.value.is_finite() {
                    return Err(invalid(
                        edge,
                        format!("pin temperature must be finite, got {}", pin.value),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Lowest and highest temperature imposed by any edge or pin.
    ///
    /// Returns `None` when every edge is adiabatic and unpinned.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        Edge::ENFORCEMENT_ORDER
            .iter()
            .flat_map(|&edge| {
                let policy = self.edge(edge);
                policy
                    .condition
                    .imposed_temperature()
                    .into_iter()
                    .chain(policy.pins.iter().map(|p| p.value))
            })
            .fold(None, |range, t| match range {
                None => Some((t, t)),
                Some((lo, hi)) => Some((f64::min(lo, t), f64::max(hi, t))),
            })
    }

    /// Rewrite every edge cell according to its policy.
    ///
    /// `conductivity` is the material's k, used by convective edges.
    pub fn enforce(&self, field: &mut TemperatureField, geometry: &GridGeometry, conductivity: f64) {
        for edge in Edge::ENFORCEMENT_ORDER {
            let spacing = if edge.is_horizontal() {
                geometry.dz()
            } else {
                geometry.dx()
            };
            apply_edge(field, edge, self.edge(edge), spacing, conductivity);
        }
    }
}

/// Closed-form Robin update for one edge cell.
///
/// Balances the one-sided conductive flux `k (T_adj - T_edge) / spacing`
/// against convective loss `h (T_edge - T_ambient)`.
pub fn convective_temperature(
    conductivity: f64,
    spacing: f64,
    h: f64,
    ambient: f64,
    adjacent: f64,
) -> f64 {
    let g = conductivity / spacing;
    (g * adjacent + h * ambient) / (g + h)
}

fn apply_edge(
    field: &mut TemperatureField,
    edge: Edge,
    policy: &EdgePolicy,
    spacing: f64,
    conductivity: f64,
) {
    let (nx, nz) = (field.nx(), field.nz());

    for i in 0..edge_len(edge, nx, nz) {
        let (cell, adjacent) = edge_cell(edge, i, nx, nz);
        let inner = field[(adjacent.row, adjacent.col)];
        field[(cell.row, cell.col)] = match policy.condition {
            BoundaryCondition::Dirichlet(value) => value,
            BoundaryCondition::Convective { h, ambient } => {
                convective_temperature(conductivity, spacing, h, ambient, inner)
            }
            BoundaryCondition::Adiabatic => inner,
        };
    }

    for pin in &policy.pins {
        let (cell, _) = edge_cell(edge, pin.index, nx, nz);
        field[(cell.row, cell.col)] = pin.value;
    }
}

fn edge_len(edge: Edge, nx: usize, nz: usize) -> usize {
    if edge.is_horizontal() {
        nx
    } else {
        nz
    }
}

/// The `i`-th cell along an edge and its interior neighbour along the normal.
fn edge_cell(edge: Edge, i: usize, nx: usize, nz: usize) -> (CellIndex, CellIndex) {
    match edge {
        Edge::Bottom => (CellIndex::new(0, i), CellIndex::new(1, i)),
        Edge::Top => (CellIndex::new(nz - 1, i), CellIndex::new(nz - 2, i)),
        Edge::Left => (CellIndex::new(i, 0), CellIndex::new(i, 1)),
        Edge::Right => (CellIndex::new(i, nx - 1), CellIndex::new(i, nx - 2)),
    }
}

fn invalid(edge: Edge, message: String) -> SlabError {
    SlabError::InvalidBoundary {
        edge: edge.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geometry() -> GridGeometry {
        GridGeometry::new(0.05, 0.005, 6, 5).unwrap()
    }

    /// A field whose value encodes its position, so copies are traceable.
    fn ramp(geometry: &GridGeometry) -> TemperatureField {
        let mut field = TemperatureField::uniform(geometry.nx(), geometry.nz(), 0.0);
        for row in 0..geometry.nz() {
            for col in 0..geometry.nx() {
                field.set(row, col, 20.0 + row as f64 * 3.0 + col as f64 * 0.5);
            }
        }
        field
    }

    #[test]
    fn test_dirichlet_bottom_exact() {
        let g = geometry();
        let mut field = ramp(&g);
        BoundarySet::heated_bed(60.0, 50.0, 20.0).enforce(&mut field, &g, 0.25);
        assert!(field.row(0).iter().all(|&t| t == 60.0));
    }

    #[test]
    fn test_convective_top() {
        let g = geometry();
        let mut field = ramp(&g);
        let bcs = BoundarySet::new(
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Convective { h: 50.0, ambient: 20.0 },
            BoundaryCondition::Dirichlet(30.0),
            BoundaryCondition::Dirichlet(30.0),
        );
        bcs.enforce(&mut field, &g, 0.25);

        let top = g.nz() - 1;
        for col in 1..g.nx() - 1 {
            let adjacent = field.get(top - 1, col);
            let expected = (0.25 * adjacent / g.dz() + 50.0 * 20.0) / (0.25 / g.dz() + 50.0);
            assert_relative_eq!(field.get(top, col), expected, max_relative = 1e-14);
            assert!(field.get(top, col) < adjacent);
        }
    }

    #[test]
    fn test_convective_left_uses_dx() {
        let g = geometry();
        assert!((g.dx() - g.dz()).abs() > 1e-4);
        let mut field = ramp(&g);
        let bcs = BoundarySet::new(
            BoundaryCondition::Dirichlet(30.0),
            BoundaryCondition::Dirichlet(30.0),
            BoundaryCondition::Convective { h: 50.0, ambient: 20.0 },
            BoundaryCondition::Adiabatic,
        );
        bcs.enforce(&mut field, &g, 0.25);

        for row in 0..g.nz() {
            let adjacent = field.get(row, 1);
            let expected = convective_temperature(0.25, g.dx(), 50.0, 20.0, adjacent);
            let with_dz = convective_temperature(0.25, g.dz(), 50.0, 20.0, adjacent);
            assert_relative_eq!(field.get(row, 0), expected, max_relative = 1e-14);
            assert!((field.get(row, 0) - with_dz).abs() > 1e-3);
        }
    }

    #[test]
    fn test_zero_h_convective_is_adiabatic() {
        let t = convective_temperature(0.25, 1e-3, 0.0, 20.0, 47.5);
        assert_relative_eq!(t, 47.5);
    }

    #[test]
    fn test_adiabatic_sides_copy_interior() {
        let g = geometry();
        let mut field = ramp(&g);
        BoundarySet::heated_bed(60.0, 50.0, 20.0).enforce(&mut field, &g, 0.25);

        for row in 0..g.nz() {
            assert_eq!(field.get(row, 0), field.get(row, 1));
            assert_eq!(field.get(row, g.nx() - 1), field.get(row, g.nx() - 2));
        }
        // Corners were rewritten by the sides from the corrected bed row.
        assert_eq!(field.get(0, 0), 60.0);
    }

    #[test]
    fn test_sides_override_corners() {
        let g = geometry();
        let mut field = ramp(&g);
        let bcs = BoundarySet::new(
            BoundaryCondition::Dirichlet(60.0),
            BoundaryCondition::Dirichlet(10.0),
            BoundaryCondition::Dirichlet(35.0),
            BoundaryCondition::Adiabatic,
        );
        bcs.enforce(&mut field, &g, 0.25);

        assert_eq!(field.get(0, 0), 35.0);
        assert_eq!(field.get(g.nz() - 1, 0), 35.0);
        assert_eq!(field.get(0, g.nx() - 1), 60.0);
        assert_eq!(field.get(g.nz() - 1, g.nx() - 1), 10.0);
    }

    #[test]
    fn test_pin_overrides_edge_policy() {
        let g = geometry();
        let mut field = ramp(&g);
        let bcs = BoundarySet::default().with_pin(Edge::Top, 3, 200.0);
        bcs.validate(&g).unwrap();
        bcs.enforce(&mut field, &g, 0.25);

        let top = g.nz() - 1;
        assert_eq!(field.get(top, 3), 200.0);
        assert!(field.get(top, 2) < 200.0);
        assert!(field.get(top, 4) < 200.0);
    }

    #[test]
    fn test_corner_pin_lost_to_adiabatic_side() {
        let g = geometry();
        let mut field = ramp(&g);
        let bcs = BoundarySet::default().with_pin(Edge::Top, 0, 200.0);
        bcs.enforce(&mut field, &g, 0.25);

        let top = g.nz() - 1;
        assert_eq!(field.get(top, 0), field.get(top, 1));
    }

    #[test]
    fn test_validate_rejects_bad_pins_and_values() {
        let g = geometry();
        let out_of_range = BoundarySet::default().with_pin(Edge::Left, g.nz(), 100.0);
        assert!(matches!(
            out_of_range.validate(&g),
            Err(SlabError::InvalidBoundary { .. })
        ));

        let negative_h = BoundarySet::default().with_edge(
            Edge::Top,
            BoundaryCondition::Convective { h: -1.0, ambient: 20.0 },
        );
        assert!(negative_h.validate(&g).is_err());

        let nan_bed = BoundarySet::default()
            .with_edge(Edge::Bottom, BoundaryCondition::Dirichlet(f64::NAN));
        assert!(nan_bed.validate(&g).is_err());
    }

    #[test]
    fn test_temperature_range() {
        let bcs = BoundarySet::default().with_pin(Edge::Top, 0, 200.0);
        assert_eq!(bcs.temperature_range(), Some((20.0, 200.0)));

        let insulated = BoundarySet::new(
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Adiabatic,
        );
        assert_eq!(insulated.temperature_range(), None);
    }
}
