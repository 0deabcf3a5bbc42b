//! End-to-end simulation scenarios.

use approx::assert_relative_eq;
use thermoslab::{
    dsl, BoundaryCondition, BoundarySet, Edge, GridGeometry, HeatSource, NozzlePath, PathShape,
    ProbeConfig, Scheme, SimulationOutcome, SimulationStatus, Simulator, SlabConfig, SlabError,
    TimeStep,
};

/// 20x10 PLA slab, 50 mm x 5 mm, 60 °C bed, top cooled by h = 50 to 20 °C.
fn printed_slab() -> SlabConfig {
    let geometry = GridGeometry::new(0.05, 0.005, 20, 10).unwrap();
    SlabConfig::new(geometry, 100.0)
}

/// 11x11 square, 10 mm side, with a 40 °C left wall so the field varies along x.
fn stability_slab(time_step: TimeStep) -> SlabConfig {
    let geometry = GridGeometry::new(0.01, 0.01, 11, 11).unwrap();
    let boundaries = BoundarySet::default().with_edge(Edge::Left, BoundaryCondition::Dirichlet(40.0));
    SlabConfig::new(geometry, 1e6)
        .with_boundaries(boundaries)
        .with_scheme(Scheme::Explicit)
        .with_time_step(time_step)
        .with_tolerance(f64::MIN_POSITIVE)
}

fn within_envelope(sim: &Simulator) -> bool {
    let field = sim.field();
    field.min() >= 20.0 - 1e-9 && field.max() <= 60.0 + 1e-9
}

#[test]
fn implicit_slab_reaches_steady_state() {
    let mut sim = Simulator::new(printed_slab()).unwrap();
    let outcome = sim.run().unwrap();

    let time = match outcome {
        SimulationOutcome::SteadyState { time, max_change, .. } => {
            assert!(max_change < 1.6e-2);
            time
        }
        other => panic!("expected steady state, got {:?}", other),
    };
    assert!(time <= 100.0);
    assert!((660..=680).contains(&outcome.iterations()));
    assert_eq!(sim.steady_state_time(), Some(time));

    let field = sim.field();
    assert!(field.row(0).iter().all(|&t| t == 60.0));
    assert!(field.row(9).iter().all(|&t| t > 20.0 && t < 60.0));
    assert_relative_eq!(field.get(9, 10), 34.35, epsilon = 0.1);
}

#[test]
fn boundaries_hold_after_every_step() {
    let mut sim = Simulator::new(printed_slab()).unwrap();
    for _ in 0..25 {
        sim.step().unwrap();
        let field = sim.field();
        assert!(field.row(0)[1..19].iter().all(|&t| t == 60.0));
        for row in 0..10 {
            assert_eq!(field.get(row, 0), field.get(row, 1));
            assert_eq!(field.get(row, 19), field.get(row, 18));
        }
    }
}

#[test]
fn sweep_count_changes_the_answer() {
    let run = |sweeps| {
        let config = printed_slab().with_scheme(Scheme::ImplicitRelaxation { sweeps });
        Simulator::new(config).unwrap().run().unwrap().iterations()
    };
    assert!(run(1) > run(50));
}

#[test]
fn explicit_at_stability_limit_stays_bounded() {
    let config = stability_slab(TimeStep::Auto { max: f64::INFINITY });
    let mut sim = Simulator::new(config).unwrap();
    for _ in 0..1000 {
        assert_eq!(sim.step().unwrap(), SimulationStatus::Running);
        assert!(within_envelope(&sim), "left envelope at t = {}", sim.time());
    }
}

#[test]
fn explicit_above_stability_limit_is_rejected() {
    let limit = stability_slab(TimeStep::Fixed(1.0)).stable_time_step();
    let config = stability_slab(TimeStep::Fixed(2.0 * limit));
    assert!(matches!(
        Simulator::new(config),
        Err(SlabError::UnstableTimeStep { .. })
    ));
}

#[test]
fn explicit_at_twice_the_limit_diverges() {
    let limit = stability_slab(TimeStep::Fixed(1.0)).stable_time_step();
    let config = stability_slab(TimeStep::Fixed(2.0 * limit)).unchecked();
    let mut sim = Simulator::new(config).unwrap();

    let mut left_envelope = false;
    for _ in 0..50 {
        match sim.step() {
            Ok(_) if within_envelope(&sim) => {}
            Ok(_) | Err(SlabError::NonFiniteTemperature { .. }) => {
                left_envelope = true;
                break;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert!(left_envelope);
    assert!(sim.iteration() <= 10);
}

#[test]
fn runaway_time_step_reports_non_finite_temperature() {
    let limit = stability_slab(TimeStep::Fixed(1.0)).stable_time_step();
    let config = stability_slab(TimeStep::Fixed(1e6 * limit))
        .with_end_time(1e300)
        .unchecked();
    let mut sim = Simulator::new(config).unwrap();

    let err = sim.run().unwrap_err();
    match err {
        SlabError::NonFiniteTemperature { time, .. } => assert!(time > 0.0),
        other => panic!("expected non-finite temperature, got {}", other),
    }

    let iteration = sim.iteration();
    assert_eq!(sim.status(), SimulationStatus::Diverged);
    assert!(sim.step().is_err());
    assert!(sim.run().is_err());
    assert_eq!(sim.iteration(), iteration);
}

#[test]
fn max_change_decreases_without_source() {
    let limit = stability_slab(TimeStep::Fixed(1.0)).stable_time_step();
    let mut sim = Simulator::new(stability_slab(TimeStep::Fixed(0.9 * limit))).unwrap();

    sim.step().unwrap();
    let mut last = sim.last_max_change().unwrap();
    for _ in 0..500 {
        sim.step().unwrap();
        let change = sim.last_max_change().unwrap();
        assert!(change <= last + 1e-12, "{} > {} at t = {}", change, last, sim.time());
        last = change;
    }
}

#[test]
fn infinite_tolerance_converges_after_one_step() {
    let mut sim = Simulator::new(printed_slab().with_tolerance(f64::INFINITY)).unwrap();
    let outcome = sim.run().unwrap();
    assert_eq!(outcome.steady_state_time(), Some(0.1));
    assert_eq!(outcome.iterations(), 1);
}

#[test]
fn moving_nozzle_heats_the_part() {
    let geometry = GridGeometry::new(0.05, 0.005, 51, 11).unwrap();
    let path = NozzlePath::new(PathShape::Triangle, 4.0, geometry.lx(), 0.002);
    let config = SlabConfig::new(geometry, 10.0)
        .with_tolerance(f64::MIN_POSITIVE)
        .with_source(HeatSource::new(path, 85.0))
        .with_probe(ProbeConfig::new(0.025, 0.002));

    let mut sim = Simulator::new(config).unwrap();
    let outcome = sim.run().unwrap();
    assert!(matches!(outcome, SimulationOutcome::TimeExceeded { .. }));

    let field = sim.field();
    assert!(field.max() > 60.0);
    assert!(field.max() <= 85.0 + 1e-9);
    assert!(field.min() >= 20.0 - 1e-9);

    // The nozzle passes the mid-width probe at t = 1 s and t = 3 s.
    let series = sim.probe_series();
    assert_eq!(series.len(), 101);
    let peak = series.iter().map(|s| s.temperature).fold(f64::MIN, f64::max);
    assert!(peak > 40.0);
}

#[test]
fn description_matches_builder() {
    let text = "\
# Ten layers of PLA on a heated bed
.grid nx=20 nz=10 lx=50m lz=5m
.material pla
.bc bottom dirichlet 60
.bc top convective h=50 ambient=20
.bc left adiabatic
.bc right adiabatic
.time dt=0.1 end=100 tol=16m
.scheme implicit sweeps=50
";
    let config = SlabConfig::from_ast(&dsl::parse(text).unwrap()).unwrap();

    let from_text = Simulator::new(config).unwrap().run().unwrap();
    let from_builder = Simulator::new(printed_slab()).unwrap().run().unwrap();
    assert_eq!(from_text.iterations(), from_builder.iterations());
    assert_relative_eq!(
        from_text.steady_state_time().unwrap(),
        from_builder.steady_state_time().unwrap()
    );
}
