//! Main simulator interface.

use tracing::{debug, info, warn};

use crate::config::SlabConfig;
use crate::error::{Result, SlabError};
use crate::grid::{CellIndex, Grid, TemperatureField};

use super::{ConvergenceMonitor, FourierNumbers, Stepper, PROGRESS_INTERVAL};

/// Where a simulation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    /// Still stepping
    Running,
    /// The per-step max change fell below the tolerance
    SteadyState,
    /// The time budget ran out first
    TimeExceeded,
    /// A step produced a non-finite temperature; the field is left as it was
    Diverged,
}

impl SimulationStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SimulationStatus::Running)
    }
}

/// Result of running a simulation to completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationOutcome {
    /// Steady state reached at `time`.
    SteadyState {
        time: f64,
        max_change: f64,
        iterations: usize,
    },
    /// Time budget exhausted without reaching steady state.
    TimeExceeded {
        time: f64,
        last_max_change: f64,
        iterations: usize,
    },
}

impl SimulationOutcome {
    /// Steady-state time, if reached.
    pub fn steady_state_time(&self) -> Option<f64> {
        match *self {
            SimulationOutcome::SteadyState { time, .. } => Some(time),
            SimulationOutcome::TimeExceeded { .. } => None,
        }
    }

    pub fn iterations(&self) -> usize {
        match *self {
            SimulationOutcome::SteadyState { iterations, .. }
            | SimulationOutcome::TimeExceeded { iterations, .. } => iterations,
        }
    }
}

/// One probe reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    /// Simulation time (s)
    pub time: f64,
    /// Temperature at the probe cell (°C)
    pub temperature: f64,
}

/// First non-finite cell of a diverged step.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Divergence {
    cell: CellIndex,
    value: f64,
    time: f64,
}

impl Divergence {
    fn error(&self) -> SlabError {
        SlabError::NonFiniteTemperature {
            row: self.cell.row,
            col: self.cell.col,
            value: self.value,
            time: self.time,
        }
    }
}

/// The main slab simulator.
///
/// Owns the grid and advances it one time step per call to [`step`](Self::step):
///
/// 1. Remember the field for the convergence check
/// 2. Deposit nozzle heat at the current time
/// 3. Update the interior with the configured stepper
/// 4. Re-impose the boundary conditions
/// 5. Reject non-finite temperatures; the simulation then stays diverged
/// 6. Advance time to `iteration * dt`, record the probe
/// 7. Check for steady state, then for the end of the time budget
pub struct Simulator {
    /// Validated configuration
    config: SlabConfig,
    /// Geometry and current field
    grid: Grid,
    /// Field at the start of the current step
    previous: TemperatureField,
    /// Interior update
    stepper: Stepper,
    /// Steady-state detection
    monitor: ConvergenceMonitor,
    /// Diffusion numbers for `dt`
    fourier: FourierNumbers,
    /// Time step (s)
    dt: f64,
    /// Completed steps
    iteration: usize,
    /// Simulation time (s)
    time: f64,
    status: SimulationStatus,
    steady_state_time: Option<f64>,
    divergence: Option<Divergence>,
    /// Probe cell, if a probe is configured
    probe_cell: Option<CellIndex>,
    probe_series: Vec<ProbeSample>,
    last_probe_time: Option<f64>,
    next_progress_time: f64,
}

impl Simulator {
    /// Create a simulator from a configuration.
    ///
    /// Fails on invalid configuration, and for the explicit scheme when the
    /// time step exceeds the stability limit unless the check is disabled.
    pub fn new(config: SlabConfig) -> Result<Self> {
        config.validate()?;

        let alpha = config.material.diffusivity();
        let limit = config.stable_time_step();
        let dt = config.resolved_time_step();

        if config.scheme.is_conditionally_stable() && dt > limit {
            if config.check_stability {
                return Err(SlabError::UnstableTimeStep { dt, limit });
            }
            warn!(dt, limit, "explicit time step exceeds the stability limit");
        }

        let grid = Grid::new(config.geometry, config.initial_temperature);
        let previous = grid.field().clone();
        let stepper = Stepper::for_scheme(config.scheme)?;
        let monitor = ConvergenceMonitor::new(config.tolerance);
        let fourier = FourierNumbers::new(alpha, dt, &config.geometry);
        let probe_cell = config.probe.and_then(|p| grid.index_of(p.x, p.z));

        debug!(
            nx = config.geometry.nx(),
            nz = config.geometry.nz(),
            dt,
            fo_x = fourier.x,
            fo_z = fourier.z,
            scheme = config.scheme.name(),
            "simulator ready"
        );

        let mut sim = Self {
            config,
            grid,
            previous,
            stepper,
            monitor,
            fourier,
            dt,
            iteration: 0,
            time: 0.0,
            status: SimulationStatus::Running,
            steady_state_time: None,
            divergence: None,
            probe_cell,
            probe_series: Vec::new(),
            last_probe_time: None,
            next_progress_time: PROGRESS_INTERVAL,
        };
        sim.record_probe();
        Ok(sim)
    }

    /// Advance by one time step.
    ///
    /// Stepping a finished simulation does nothing and returns its final
    /// status. A diverged simulation returns its `NonFiniteTemperature`
    /// error again without touching the field.
    pub fn step(&mut self) -> Result<SimulationStatus> {
        if let Some(divergence) = self.divergence {
            return Err(divergence.error());
        }
        if self.status.is_finished() {
            return Ok(self.status);
        }

        self.previous.copy_from(self.grid.field());

        if let Some(source) = &self.config.source {
            source.deposit(&mut self.grid, self.time);
        }

        self.stepper.step(self.grid.field_mut(), self.fourier);
        self.config.boundaries.enforce(
            self.grid.field_mut(),
            &self.config.geometry,
            self.config.material.conductivity(),
        );

        let next_time = (self.iteration + 1) as f64 * self.dt;
        if let Some((cell, value)) = self.grid.field().first_non_finite() {
            let divergence = Divergence {
                cell,
                value,
                time: next_time,
            };
            self.divergence = Some(divergence);
            self.status = SimulationStatus::Diverged;
            warn!(time = next_time, row = cell.row, col = cell.col, "temperature diverged");
            return Err(divergence.error());
        }

        self.iteration += 1;
        self.time = next_time;
        self.record_probe();

        let check = self.monitor.check(&self.previous, self.grid.field());

        if self.time >= self.next_progress_time {
            let residual = self.stepper.residual(self.grid.field(), self.fourier);
            debug!(
                time = self.time,
                max_change = check.max_change,
                residual = ?residual,
                "progress"
            );
            self.next_progress_time += PROGRESS_INTERVAL;
        }

        if check.converged {
            self.status = SimulationStatus::SteadyState;
            self.steady_state_time = Some(self.time);
            info!(
                time = self.time,
                max_change = check.max_change,
                iterations = self.iteration,
                "steady state reached"
            );
        } else if self.time >= self.config.end_time {
            self.status = SimulationStatus::TimeExceeded;
            info!(
                time = self.time,
                last_max_change = check.max_change,
                iterations = self.iteration,
                "time budget exhausted before steady state"
            );
        }

        Ok(self.status)
    }

    /// Step until at most `max_steps` steps have run or the simulation finishes.
    pub fn run_steps(&mut self, max_steps: usize) -> Result<SimulationStatus> {
        for _ in 0..max_steps {
            if self.step()?.is_finished() {
                break;
            }
        }
        Ok(self.status)
    }

    /// Step until steady state or the end of the time budget.
    pub fn run(&mut self) -> Result<SimulationOutcome> {
        loop {
            if let Some(outcome) = self.outcome() {
                return Ok(outcome);
            }
            self.step()?;
        }
    }

    /// Final outcome, once finished. A diverged run has none; its error is
    /// returned by [`step`](Self::step).
    pub fn outcome(&self) -> Option<SimulationOutcome> {
        let max_change = self.last_max_change().unwrap_or(0.0);
        match self.status {
            SimulationStatus::Running | SimulationStatus::Diverged => None,
            SimulationStatus::SteadyState => Some(SimulationOutcome::SteadyState {
                time: self.time,
                max_change,
                iterations: self.iteration,
            }),
            SimulationStatus::TimeExceeded => Some(SimulationOutcome::TimeExceeded {
                time: self.time,
                last_max_change: max_change,
                iterations: self.iteration,
            }),
        }
    }

    fn record_probe(&mut self) {
        let Some(cell) = self.probe_cell else {
            return;
        };
        let interval = self.config.probe.map_or(0.0, |p| p.interval);
        if let Some(last) = self.last_probe_time {
            // Slack of 1e-9 dt absorbs rounding in `iteration * dt`.
            if self.time - last + 1e-9 * self.dt < interval {
                return;
            }
        }
        if let Some(temperature) = self.grid.field().at(cell) {
            self.probe_series.push(ProbeSample {
                time: self.time,
                temperature,
            });
            self.last_probe_time = Some(self.time);
        }
    }

    /// Current temperature field.
    pub fn field(&self) -> &TemperatureField {
        self.grid.field()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SlabConfig {
        &self.config
    }

    /// Simulation time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time step in use (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Diffusion numbers of the time step.
    pub fn fourier_numbers(&self) -> FourierNumbers {
        self.fourier
    }

    /// Number of completed steps.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Time at which steady state was reached, if it was.
    pub fn steady_state_time(&self) -> Option<f64> {
        self.steady_state_time
    }

    /// Max per-cell change of the most recent step.
    pub fn last_max_change(&self) -> Option<f64> {
        self.monitor.last_max_change()
    }

    /// Probe readings so far, oldest first.
    pub fn probe_series(&self) -> &[ProbeSample] {
        &self.probe_series
    }

    /// Vertical gradient `(T_top - T_bottom) / lz` at mid-width, in °C/m.
    pub fn vertical_gradient(&self) -> f64 {
        self.grid.vertical_gradient(self.config.geometry.nx() / 2)
    }

    /// Vertical gradient through column `col`, or `None` outside the grid.
    pub fn gradient_at(&self, col: usize) -> Option<f64> {
        (col < self.config.geometry.nx()).then(|| self.grid.vertical_gradient(col))
    }
}
