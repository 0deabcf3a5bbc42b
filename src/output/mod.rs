//! CSV output for the CLI frontend.
//!
//! Writes the final field, probe series and mesh study results as CSV.
//! Temperatures are in °C, lengths in mm and times in seconds.

use std::io::{self, BufWriter, Write};

use crate::error::{Result, SlabError};
use crate::grid::{GridGeometry, TemperatureField};
use crate::solver::ProbeSample;
use crate::study::MeshStudyPoint;

/// Buffered CSV writer.
pub struct CsvOutput<W: Write> {
    writer: BufWriter<W>,
}

impl CsvOutput<io::Stdout> {
    /// Writer on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CsvOutput<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text).map_err(output_error)
    }

    /// Every cell as `x_mm,z_mm,temperature_c`, bottom row first.
    pub fn write_field(&mut self, field: &TemperatureField, geometry: &GridGeometry) -> Result<()> {
        self.line("x_mm,z_mm,temperature_c")?;
        for row in 0..field.nz() {
            let z = geometry.z_of(row) * 1e3;
            for (col, t) in field.row(row).iter().enumerate() {
                let x = geometry.x_of(col) * 1e3;
                self.line(&format!("{:.4},{:.4},{:.6}", x, z, t))?;
            }
        }
        Ok(())
    }

    /// Probe readings as `time_s,temperature_c`.
    pub fn write_series(&mut self, samples: &[ProbeSample]) -> Result<()> {
        self.line("time_s,temperature_c")?;
        for s in samples {
            self.line(&format!("{:.4},{:.6}", s.time, s.temperature))?;
        }
        Ok(())
    }

    /// One line per mesh. The steady-state column is empty when not reached.
    pub fn write_mesh_study(&mut self, points: &[MeshStudyPoint]) -> Result<()> {
        self.line("nx,nz,points,steady_state_time_s,gradient_c_per_mm,last_max_change,iterations")?;
        for p in points {
            let steady = p
                .steady_state_time
                .map(|t| format!("{:.1}", t))
                .unwrap_or_default();
            self.line(&format!(
                "{},{},{},{},{:.3},{:.3e},{}",
                p.nx,
                p.nz,
                p.points(),
                steady,
                p.gradient_per_mm(),
                p.last_max_change,
                p.iterations
            ))?;
        }
        Ok(())
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(output_error)
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| output_error(e.into_error()))
    }
}

fn output_error(e: io::Error) -> SlabError {
    SlabError::OutputError {
        message: e.to_string(),
    }
}
