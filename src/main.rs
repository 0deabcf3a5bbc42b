//! Thermoslab - printed slab heat conduction simulator
//!
//! Runs the simulation described in a slab file and writes CSV to stdout.
//! Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! thermoslab part.slab --field > field.csv
//! thermoslab part.slab --series -v > probe.csv
//! thermoslab part.slab --mesh 100x10 --mesh 200x20 > mesh.csv
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use thermoslab::{dsl, error::Result, output::CsvOutput, study, SimulationOutcome, Simulator, SlabConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Printed slab heat conduction simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the slab description file (.slab)
    #[arg(value_name = "SLAB_FILE")]
    slab_file: PathBuf,

    /// Write the final temperature field as CSV
    #[arg(long)]
    field: bool,

    /// Write the probe time series as CSV
    #[arg(long, conflicts_with = "field")]
    series: bool,

    /// Run a mesh convergence study at NXxNZ (repeatable) instead of a single run
    #[arg(long, value_name = "NXxNZ", value_parser = parse_mesh, conflicts_with_all = ["field", "series"])]
    mesh: Vec<(usize, usize)>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_mesh(s: &str) -> std::result::Result<(usize, usize), String> {
    let (nx, nz) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected NXxNZ, got '{}'", s))?;
    let nx = nx.trim().parse().map_err(|_| format!("invalid nx in '{}'", s))?;
    let nz = nz.trim().parse().map_err(|_| format!("invalid nz in '{}'", s))?;
    Ok((nx, nz))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let ast = dsl::parse_file(&args.slab_file)?;
    let config = SlabConfig::from_ast(&ast)?;
    let mut out = CsvOutput::stdout();

    if !args.mesh.is_empty() {
        let points = study::run_mesh_study(&config, &args.mesh)?;
        out.write_mesh_study(&points)?;
        return out.flush();
    }

    let mut simulator = Simulator::new(config)?;
    match simulator.run()? {
        SimulationOutcome::SteadyState { time, .. } => {
            info!(time, gradient = simulator.vertical_gradient(), "done");
        }
        SimulationOutcome::TimeExceeded { time, last_max_change, .. } => {
            info!(time, last_max_change, "steady state not reached");
        }
    }

    if args.field {
        out.write_field(simulator.field(), simulator.grid().geometry())?;
    } else if args.series {
        out.write_series(simulator.probe_series())?;
    }
    out.flush()
}
