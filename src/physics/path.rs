//! Nozzle trajectories.
//!
//! The nozzle sweeps across the slab width at a fixed height. Its x
//! position is a periodic function of elapsed time with values in `[0, 1]`
//! scaled by the slab width.

/// Shape of the periodic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathShape {
    /// Back and forth: 0 -> 1 in the first half period, 1 -> 0 in the second
    #[default]
    Triangle,
    /// One-way raster: 0 -> 1, then jump back to 0
    Sawtooth,
}

impl PathShape {
    /// Parse shape from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "triangle" | "tri" | "zigzag" => Some(Self::Triangle),
            "sawtooth" | "saw" | "raster" => Some(Self::Sawtooth),
            _ => None,
        }
    }

    /// Normalized position (0.0 to 1.0) at a phase in `[0, 1)`.
    pub fn at_phase(&self, phase: f64) -> f64 {
        match self {
            PathShape::Triangle => {
                if phase < 0.5 {
                    2.0 * phase
                } else {
                    2.0 * (1.0 - phase)
                }
            }
            PathShape::Sawtooth => phase,
        }
    }
}

/// A nozzle moving periodically across the slab at fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzlePath {
    /// Sweep shape
    pub shape: PathShape,
    /// Duration of one full period (s)
    pub period: f64,
    /// Distance travelled from x = 0 at the far end of the sweep (m)
    pub width: f64,
    /// Fixed z position above the bed (m)
    pub height: f64,
}

impl NozzlePath {
    /// Create a new path.
    pub fn new(shape: PathShape, period: f64, width: f64, height: f64) -> Self {
        Self {
            shape,
            period,
            width,
            height,
        }
    }

    /// Phase within the current period, in `[0, 1)`.
    pub fn phase(&self, time: f64) -> f64 {
        let phase = (time / self.period).fract();
        if phase < 0.0 {
            phase + 1.0
        } else {
            phase
        }
    }

    /// Physical `(x, z)` nozzle position at a given simulation time.
    pub fn position(&self, time: f64) -> (f64, f64) {
        let x = self.width * self.shape.at_phase(self.phase(time));
        (x, self.height)
    }
}
