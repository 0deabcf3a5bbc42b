//! Thermal material properties.

use crate::error::{Result, SlabError};

/// Bulk thermal properties of the printed material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Density (kg/m³)
    density: f64,
    /// Specific heat capacity (J/(kg·K))
    specific_heat: f64,
    /// Thermal conductivity (W/(m·K))
    conductivity: f64,
}

impl MaterialProperties {
    /// Create validated material properties. All values must be positive and finite.
    pub fn new(density: f64, specific_heat: f64, conductivity: f64) -> Result<Self> {
        check_positive("density", density)?;
        check_positive("specific_heat", specific_heat)?;
        check_positive("conductivity", conductivity)?;
        Ok(Self {
            density,
            specific_heat,
            conductivity,
        })
    }

    /// PLA filament: ρ = 1200 kg/m³, cp = 1500 J/(kg·K), k = 0.25 W/(m·K).
    pub fn pla() -> Self {
        Self {
            density: 1200.0,
            specific_heat: 1500.0,
            conductivity: 0.25,
        }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn specific_heat(&self) -> f64 {
        self.specific_heat
    }

    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }

    /// Thermal diffusivity α = k / (ρ·cp) in m²/s.
    pub fn diffusivity(&self) -> f64 {
        self.conductivity / (self.density * self.specific_heat)
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::pla()
    }
}

fn check_positive(property: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SlabError::InvalidMaterial { property, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pla_diffusivity() {
        let pla = MaterialProperties::pla();
        assert_relative_eq!(pla.diffusivity(), 1.3889e-7, max_relative = 1e-4);
        assert_eq!(MaterialProperties::new(1200.0, 1500.0, 0.25).unwrap(), pla);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!(
            MaterialProperties::new(0.0, 1500.0, 0.25),
            Err(SlabError::InvalidMaterial { property: "density", .. })
        ));
        assert!(matches!(
            MaterialProperties::new(1200.0, -1.0, 0.25),
            Err(SlabError::InvalidMaterial { property: "specific_heat", .. })
        ));
        assert!(matches!(
            MaterialProperties::new(1200.0, 1500.0, f64::INFINITY),
            Err(SlabError::InvalidMaterial { property: "conductivity", .. })
        ));
    }
}
