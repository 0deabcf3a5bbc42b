//! Simulation configuration.
//!
//! A [`SlabConfig`] bundles everything one run needs. It can be built in
//! code with the `with_*` methods or read from a slab description via
//! [`SlabConfig::from_ast`].

use crate::dsl::{Directive, DirectiveKind, SlabAst, Value};
use crate::error::{Result, SlabError};
use crate::grid::{Edge, GridGeometry};
use crate::physics::{
    BoundaryCondition, BoundarySet, HeatSource, MaterialProperties, NozzlePath, PathShape,
    DEFAULT_DEPOSIT_TEMPERATURE, DEFAULT_NOZZLE_HEIGHT, DEFAULT_SWEEP_PERIOD,
};
use crate::solver::{Scheme, DEFAULT_SWEEPS, DEFAULT_TIME_STEP, DEFAULT_TOLERANCE};

/// Default uniform initial temperature (°C).
pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 20.0;

/// How the time step is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeStep {
    /// Fixed step (s)
    Fixed(f64),
    /// Explicit stability limit of the grid, capped at `max` (s)
    Auto { max: f64 },
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::Fixed(DEFAULT_TIME_STEP)
    }
}

impl TimeStep {
    /// Concrete step given the explicit stability limit.
    pub fn resolve(&self, stable_limit: f64) -> f64 {
        match *self {
            TimeStep::Fixed(dt) => dt,
            TimeStep::Auto { max } => stable_limit.min(max),
        }
    }
}

/// A probe recording the temperature at a physical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    /// Position along the width (m)
    pub x: f64,
    /// Height above the bed (m)
    pub z: f64,
    /// Minimum simulated time between samples (s); 0 records every step
    pub interval: f64,
}

impl ProbeConfig {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z, interval: 0.0 }
    }

    /// Set the minimum simulated time between samples.
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }
}

/// Configuration of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabConfig {
    /// Extents and resolution
    pub geometry: GridGeometry,
    /// Thermal properties
    pub material: MaterialProperties,
    /// Uniform starting temperature (°C)
    pub initial_temperature: f64,
    /// Edge conditions and pins
    pub boundaries: BoundarySet,
    /// Time step selection
    pub time_step: TimeStep,
    /// Simulated time budget (s)
    pub end_time: f64,
    /// Steady-state threshold on the per-step max change (°C)
    pub tolerance: f64,
    /// Integration scheme
    pub scheme: Scheme,
    /// Optional moving nozzle
    pub source: Option<HeatSource>,
    /// Optional temperature probe
    pub probe: Option<ProbeConfig>,
    /// Reject explicit time steps above the stability limit
    pub check_stability: bool,
}

impl SlabConfig {
    /// Create a configuration with default physics for a geometry and time budget.
    pub fn new(geometry: GridGeometry, end_time: f64) -> Self {
        Self {
            geometry,
            material: MaterialProperties::default(),
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            boundaries: BoundarySet::default(),
            time_step: TimeStep::default(),
            end_time,
            tolerance: DEFAULT_TOLERANCE,
            scheme: Scheme::default(),
            source: None,
            probe: None,
            check_stability: true,
        }
    }

    pub fn with_material(mut self, material: MaterialProperties) -> Self {
        self.material = material;
        self
    }

    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_boundaries(mut self, boundaries: BoundarySet) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_time_step(mut self, time_step: TimeStep) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    /// Set the steady-state tolerance (°C per step).
    ///
    /// `f64::INFINITY` declares steady state after the first step.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_source(mut self, source: HeatSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Allow explicit time steps above the stability limit.
    pub fn unchecked(mut self) -> Self {
        self.check_stability = false;
        self
    }

    /// Same physical setup on a different mesh.
    pub fn with_resolution(mut self, nx: usize, nz: usize) -> Result<Self> {
        self.geometry = self.geometry.with_resolution(nx, nz)?;
        Ok(self)
    }

    /// Explicit stability limit for this grid and material (s).
    pub fn stable_time_step(&self) -> f64 {
        self.geometry.stable_time_step(self.material.diffusivity())
    }

    /// Concrete time step for this configuration (s).
    pub fn resolved_time_step(&self) -> f64 {
        self.time_step.resolve(self.stable_time_step())
    }

    /// Check every value that the type system does not.
    ///
    /// The stability limit is not checked here; the simulator does that.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() {
            return Err(SlabError::invalid_param(format!(
                "initial temperature must be finite, got {}",
                self.initial_temperature
            )));
        }

        self.boundaries.validate(&self.geometry)?;

        match self.time_step {
            TimeStep::Fixed(dt) => check_positive("time step", dt)?,
            TimeStep::Auto { max } => {
                if !(max > 0.0) {
                    return Err(SlabError::invalid_param(format!(
                        "maximum time step must be positive, got {}",
                        max
                    )));
                }
            }
        }
        check_positive("end time", self.end_time)?;
        if !(self.tolerance > 0.0) {
            return Err(SlabError::invalid_param(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }

        if let Scheme::ImplicitRelaxation { sweeps: 0 } = self.scheme {
            return Err(SlabError::invalid_param(
                "relaxation needs at least one sweep per step",
            ));
        }

        if let Some(source) = &self.source {
            validate_source(source)?;
        }

        if let Some(probe) = &self.probe {
            if self.geometry.index_of(probe.x, probe.z).is_none() {
                return Err(SlabError::invalid_param(format!(
                    "probe at ({} m, {} m) is outside the slab",
                    probe.x, probe.z
                )));
            }
            if !(probe.interval >= 0.0 && probe.interval.is_finite()) {
                return Err(SlabError::invalid_param(format!(
                    "probe interval must be non-negative, got {}",
                    probe.interval
                )));
            }
        }

        Ok(())
    }

    /// Build a configuration from a parsed slab description.
    pub fn from_ast(ast: &SlabAst) -> Result<Self> {
        let grid = single(ast, DirectiveKind::Grid)?.ok_or_else(|| SlabError::MissingDirective {
            directive: DirectiveKind::Grid.name().to_string(),
        })?;
        let time = single(ast, DirectiveKind::Time)?.ok_or_else(|| SlabError::MissingDirective {
            directive: DirectiveKind::Time.name().to_string(),
        })?;

        let geometry = geometry_from(grid)?;
        let (time_step, end_time, tolerance) = time_from(time)?;

        let mut config = SlabConfig::new(geometry, end_time)
            .with_time_step(time_step)
            .with_tolerance(tolerance);

        if let Some(d) = single(ast, DirectiveKind::Material)? {
            config.material = material_from(d)?;
        }

        if let Some(d) = single(ast, DirectiveKind::Initial)? {
            no_params(d)?;
            config.initial_temperature = only_number_arg(d)?;
        }

        if let Some(d) = single(ast, DirectiveKind::Scheme)? {
            let (scheme, check_stability) = scheme_from(d)?;
            config.scheme = scheme;
            config.check_stability = check_stability;
        }

        config.boundaries = boundaries_from(ast)?;

        if let Some(d) = single(ast, DirectiveKind::Source)? {
            config.source = Some(source_from(d, geometry.lx())?);
        }

        if let Some(d) = single(ast, DirectiveKind::Probe)? {
            config.probe = Some(probe_from(d)?);
        }

        config.validate()?;
        Ok(config)
    }
}

fn check_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SlabError::invalid_param(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

fn validate_source(source: &HeatSource) -> Result<()> {
    check_positive("sweep period", source.path.period)?;
    check_positive("nozzle radius", source.nozzle_radius)?;
    if !source.deposit_temperature.is_finite() {
        return Err(SlabError::invalid_param(format!(
            "deposit temperature must be finite, got {}",
            source.deposit_temperature
        )));
    }
    if !(0.0..=1.0).contains(&source.blend_fraction) {
        return Err(SlabError::invalid_param(format!(
            "blend fraction must be within [0, 1], got {}",
            source.blend_fraction
        )));
    }
    if !source.path.height.is_finite() {
        return Err(SlabError::invalid_param("nozzle height must be finite"));
    }
    Ok(())
}

// ============ Directive Helpers ============

/// The only directive of a kind, rejecting repeats.
fn single(ast: &SlabAst, kind: DirectiveKind) -> Result<Option<&Directive>> {
    let mut found = ast.of_kind(kind);
    let first = found.next();
    if let Some(dup) = found.next() {
        return Err(SlabError::DuplicateDirective {
            directive: kind.name().to_string(),
            line: dup.line,
        });
    }
    Ok(first)
}

fn bad(d: &Directive, param: &str, message: impl Into<String>) -> SlabError {
    SlabError::invalid_parameter(d.kind.name(), param, d.line, message)
}

fn allow_params(d: &Directive, allowed: &[&str]) -> Result<()> {
    match d.params.iter().find(|(name, _)| !allowed.contains(&name.as_str())) {
        Some((name, _)) => Err(bad(d, name, "unknown parameter")),
        None => Ok(()),
    }
}

fn no_params(d: &Directive) -> Result<()> {
    allow_params(d, &[])
}

fn no_args(d: &Directive) -> Result<()> {
    match d.args.first() {
        Some(arg) => Err(bad(d, &arg.to_string(), "unexpected argument")),
        None => Ok(()),
    }
}

fn number(d: &Directive, name: &str) -> Result<Option<f64>> {
    match d.param(name) {
        None => Ok(None),
        Some(Value::Number(v)) => Ok(Some(*v)),
        Some(Value::Word(w)) => Err(bad(d, name, format!("expected a number, got '{}'", w))),
    }
}

fn required(d: &Directive, name: &str) -> Result<f64> {
    number(d, name)?.ok_or_else(|| bad(d, name, "is required"))
}

fn as_count(d: &Directive, name: &str, value: f64) -> Result<usize> {
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(bad(d, name, format!("expected a whole number, got {}", value)))
    }
}

fn count(d: &Directive, name: &str) -> Result<Option<usize>> {
    number(d, name)?.map(|v| as_count(d, name, v)).transpose()
}

fn word_arg<'d>(d: &'d Directive, index: usize, what: &str) -> Result<&'d str> {
    match d.args.get(index) {
        Some(Value::Word(w)) => Ok(w),
        Some(Value::Number(v)) => Err(bad(d, what, format!("expected a name, got {}", v))),
        None => Err(bad(d, what, "is required")),
    }
}

fn number_arg(d: &Directive, index: usize, what: &str) -> Result<f64> {
    match d.args.get(index) {
        Some(Value::Number(v)) => Ok(*v),
        Some(Value::Word(w)) => Err(bad(d, what, format!("expected a number, got '{}'", w))),
        None => Err(bad(d, what, "is required")),
    }
}

fn max_args(d: &Directive, n: usize) -> Result<()> {
    match d.args.get(n) {
        Some(arg) => Err(bad(d, &arg.to_string(), "unexpected argument")),
        None => Ok(()),
    }
}

fn only_number_arg(d: &Directive) -> Result<f64> {
    max_args(d, 1)?;
    number_arg(d, 0, "value")
}

fn edge_arg(d: &Directive) -> Result<Edge> {
    let name = word_arg(d, 0, "edge")?;
    Edge::from_name(name).ok_or_else(|| bad(d, "edge", format!("unknown edge '{}'", name)))
}

// ============ Directive Conversion ============

fn geometry_from(d: &Directive) -> Result<GridGeometry> {
    no_args(d)?;
    allow_params(d, &["nx", "nz", "lx", "lz"])?;
    let nx = as_count(d, "nx", required(d, "nx")?)?;
    let nz = as_count(d, "nz", required(d, "nz")?)?;
    GridGeometry::new(required(d, "lx")?, required(d, "lz")?, nx, nz)
}

fn time_from(d: &Directive) -> Result<(TimeStep, f64, f64)> {
    no_args(d)?;
    allow_params(d, &["dt", "max", "end", "tol"])?;

    let time_step = match d.param("dt") {
        None => TimeStep::default(),
        Some(Value::Number(dt)) => {
            if d.param("max").is_some() {
                return Err(bad(d, "max", "only applies to dt=auto"));
            }
            TimeStep::Fixed(*dt)
        }
        Some(Value::Word(w)) if w == "auto" => TimeStep::Auto {
            max: number(d, "max")?.unwrap_or(f64::INFINITY),
        },
        Some(Value::Word(w)) => {
            return Err(bad(d, "dt", format!("expected a number or 'auto', got '{}'", w)));
        }
    };

    let end_time = required(d, "end")?;
    let tolerance = number(d, "tol")?.unwrap_or(DEFAULT_TOLERANCE);
    Ok((time_step, end_time, tolerance))
}

fn material_from(d: &Directive) -> Result<MaterialProperties> {
    if let Some(Value::Word(name)) = d.args.first() {
        max_args(d, 1)?;
        no_params(d)?;
        return match name.as_str() {
            "pla" => Ok(MaterialProperties::pla()),
            other => Err(bad(d, "material", format!("unknown material '{}'", other))),
        };
    }
    no_args(d)?;
    allow_params(d, &["rho", "cp", "k"])?;
    MaterialProperties::new(required(d, "rho")?, required(d, "cp")?, required(d, "k")?)
}

fn scheme_from(d: &Directive) -> Result<(Scheme, bool)> {
    match word_arg(d, 0, "scheme")? {
        "implicit" => {
            max_args(d, 1)?;
            allow_params(d, &["sweeps"])?;
            let sweeps = count(d, "sweeps")?.unwrap_or(DEFAULT_SWEEPS);
            Ok((Scheme::ImplicitRelaxation { sweeps }, true))
        }
        "explicit" => {
            no_params(d)?;
            max_args(d, 2)?;
            let checked = match d.args.get(1) {
                None => true,
                Some(Value::Word(w)) if w == "unchecked" => false,
                Some(other) => return Err(bad(d, &other.to_string(), "unexpected argument")),
            };
            Ok((Scheme::Explicit, checked))
        }
        other => Err(bad(d, "scheme", format!("unknown scheme '{}'", other))),
    }
}

fn boundaries_from(ast: &SlabAst) -> Result<BoundarySet> {
    let mut boundaries = BoundarySet::default();
    let mut seen: Vec<Edge> = Vec::new();

    for d in ast.of_kind(DirectiveKind::Boundary) {
        let edge = edge_arg(d)?;
        if seen.contains(&edge) {
            return Err(SlabError::DuplicateDirective {
                directive: format!("{} {}", d.kind.name(), edge),
                line: d.line,
            });
        }
        seen.push(edge);

        let condition = match word_arg(d, 1, "kind")? {
            "dirichlet" | "fixed" => {
                no_params(d)?;
                max_args(d, 3)?;
                BoundaryCondition::Dirichlet(number_arg(d, 2, "temperature")?)
            }
            "convective" | "robin" => {
                max_args(d, 2)?;
                allow_params(d, &["h", "ambient"])?;
                BoundaryCondition::Convective {
                    h: required(d, "h")?,
                    ambient: required(d, "ambient")?,
                }
            }
            "adiabatic" | "insulated" => {
                no_params(d)?;
                max_args(d, 2)?;
                BoundaryCondition::Adiabatic
            }
            other => return Err(bad(d, "kind", format!("unknown boundary kind '{}'", other))),
        };
        boundaries = boundaries.with_edge(edge, condition);
    }

    for d in ast.of_kind(DirectiveKind::Pin) {
        no_params(d)?;
        max_args(d, 3)?;
        let edge = edge_arg(d)?;
        let index = as_count(d, "index", number_arg(d, 1, "index")?)?;
        let value = number_arg(d, 2, "temperature")?;
        boundaries = boundaries.with_pin(edge, index, value);
    }

    Ok(boundaries)
}

fn source_from(d: &Directive, width: f64) -> Result<HeatSource> {
    no_args(d)?;
    allow_params(
        d,
        &["temp", "radius", "height", "period", "blend", "window", "path", "until"],
    )?;

    let shape = match d.param("path") {
        None => PathShape::default(),
        Some(Value::Word(w)) => PathShape::from_name(w)
            .ok_or_else(|| bad(d, "path", format!("unknown path '{}'", w)))?,
        Some(Value::Number(v)) => return Err(bad(d, "path", format!("expected a name, got {}", v))),
    };
    let path = NozzlePath::new(
        shape,
        number(d, "period")?.unwrap_or(DEFAULT_SWEEP_PERIOD),
        width,
        number(d, "height")?.unwrap_or(DEFAULT_NOZZLE_HEIGHT),
    );

    let mut source = HeatSource::new(
        path,
        number(d, "temp")?.unwrap_or(DEFAULT_DEPOSIT_TEMPERATURE),
    );
    if let Some(radius) = number(d, "radius")? {
        source = source.with_nozzle_radius(radius);
    }
    if let Some(blend) = number(d, "blend")? {
        source = source.with_blend_fraction(blend);
    }
    if let Some(window) = count(d, "window")? {
        source = source.with_window(window);
    }
    if let Some(until) = number(d, "until")? {
        source = source.with_active_until(until);
    }
    Ok(source)
}

fn probe_from(d: &Directive) -> Result<ProbeConfig> {
    no_args(d)?;
    allow_params(d, &["x", "z", "every"])?;
    let probe = ProbeConfig::new(required(d, "x")?, required(d, "z")?);
    Ok(match number(d, "every")? {
        Some(interval) => probe.with_interval(interval),
        None => probe,
    })
}
