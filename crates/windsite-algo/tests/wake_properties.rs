//! Wake field and interference property tests

use ndarray::Array2;
use windsite_algo::{FieldSampler, InterferenceEvaluator, JensenWake, WakeModel};
use windsite_core::{
    DecayConstant, Grid, Position, PowerCurve, ProbabilityPolicy, TurbineSpec, WindRegime,
    WindScenario,
};

/// D = 80 m, C_t = 0.8, offshore decay 0.05
fn turbine() -> TurbineSpec {
    let curve = PowerCurve::from_pairs(&[
        (3.0, 0.0),
        (6.0, 300.0),
        (9.0, 1100.0),
        (12.0, 2000.0),
        (25.0, 2000.0),
    ])
    .unwrap();
    TurbineSpec::new(80.0, 0.8, curve).unwrap()
}

fn decay() -> DecayConstant {
    DecayConstant::new(0.05).unwrap()
}

fn grid() -> Grid {
    Grid::from_axes(
        Grid::linspace(-1000.0, 1500.0, 101),
        Grid::linspace(-600.0, 600.0, 49),
    )
    .unwrap()
}

fn jensen_deficit(u: f64, x: f64) -> f64 {
    u * (1.0 - (1.0 - 0.8_f64).sqrt()) * (80.0 / (80.0 + 2.0 * 0.05 * x)).powi(2)
}

#[test]
fn test_no_deficit_upstream_or_outside_cone() {
    let wake = JensenWake::new(&turbine(), decay());
    for x in [-1000.0, -1.0, 0.0] {
        for lateral in [-50.0, 0.0, 50.0] {
            assert_eq!(wake.deficit(10.0, x, lateral), 0.0, "x={x} lateral={lateral}");
        }
    }
    for x in [10.0, 500.0, 2000.0] {
        let half = wake.wake_width(x).value() / 2.0;
        assert_eq!(wake.deficit(10.0, x, half + 1e-6), 0.0);
        assert_eq!(wake.deficit(10.0, x, -half - 1e-6), 0.0);
    }
}

#[test]
fn test_axial_deficit_matches_formula_and_recovers() {
    let wake = JensenWake::new(&turbine(), decay());
    let mut previous = f64::INFINITY;
    for step in 1..=40 {
        let x = step as f64 * 50.0;
        let d = wake.deficit(10.0, x, 0.0);
        assert!((d - jensen_deficit(10.0, x)).abs() < 1e-12);
        assert!(d < previous, "deficit must strictly decrease with distance");
        previous = d;
    }
}

#[test]
fn test_combined_speed_is_minimum_of_single_turbine_fields() {
    let grid = grid();
    let model = WakeModel::new(&turbine(), decay());
    let scenario = WindScenario::new(11.0, 240.0, 1.0);
    let turbines = [
        Position::new(0.0, 0.0),
        Position::new(250.0, 150.0),
        Position::new(600.0, 80.0),
        Position::new(300.0, -200.0),
    ];

    let combined = model.scenario_field(&grid, &turbines, &scenario).unwrap();
    let singles: Vec<Array2<f64>> = turbines
        .iter()
        .map(|t| model.scenario_field(&grid, std::slice::from_ref(t), &scenario).unwrap())
        .collect();

    for (idx, &u) in combined.indexed_iter() {
        let expected = singles.iter().map(|f| f[idx]).fold(11.0, f64::min);
        assert_eq!(u, expected);
        assert!(u <= 11.0);
    }
}

#[test]
fn test_scenario_aggregation_is_linear() {
    let grid = grid();
    let model = WakeModel::new(&turbine(), decay());
    let turbines = [Position::new(0.0, 0.0), Position::new(400.0, 100.0)];
    let scenarios = vec![
        WindScenario::new(10.0, 270.0, 0.5),
        WindScenario::new(8.0, 225.0, 0.3),
        WindScenario::new(12.0, 315.0, 0.2),
    ];

    let regime = WindRegime::with_policy(scenarios.clone(), ProbabilityPolicy::Reject).unwrap();
    let field = model.field(&grid, &turbines, &regime).unwrap();

    let mut expected = Array2::<f64>::zeros(grid.shape());
    for s in &scenarios {
        let single = model.scenario_field(&grid, &turbines, s).unwrap();
        expected.scaled_add(s.probability, &single);
    }

    for (a, b) in field.speeds().iter().zip(expected.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_unnormalized_weights_pass_through() {
    let grid = grid();
    let model = WakeModel::new(&turbine(), decay());
    let regime = WindRegime::with_policy(
        vec![WindScenario::new(10.0, 270.0, 0.5), WindScenario::new(10.0, 90.0, 0.25)],
        ProbabilityPolicy::PassThrough,
    )
    .unwrap();
    let field = model.field(&grid, &[Position::new(0.0, 0.0)], &regime).unwrap();
    // free-stream points carry the raw weight sum
    assert!((field.max() - 7.5).abs() < 1e-12);
}

#[test]
fn test_zero_interference_at_field_maximum() {
    let grid = grid();
    let turbine = turbine();
    let model = WakeModel::new(&turbine, decay());
    let regime = WindRegime::with_policy(
        vec![WindScenario::new(10.0, 270.0, 0.7), WindScenario::new(9.0, 180.0, 0.3)],
        ProbabilityPolicy::Reject,
    )
    .unwrap();
    let sources = [Position::new(0.0, 0.0), Position::new(500.0, 0.0)];
    let field = model.field(&grid, &sources, &regime).unwrap();

    let fastest = field.argmax(&grid).unwrap();
    let candidates = [sources[0], sources[1], fastest];
    let coeffs = InterferenceEvaluator::new(&turbine.power_curve)
        .evaluate(&grid, &field, &candidates)
        .unwrap();

    assert_eq!(coeffs.as_slice()[2], 0.0);
    // the downstream source sits in the other's wake
    assert!(coeffs.as_slice()[1] > 0.0);
    assert!(coeffs.as_slice().iter().all(|&w| w >= 0.0));
}

#[test]
fn test_single_turbine_end_to_end() {
    let grid = Grid::from_axes(
        Grid::linspace(-1000.0, 1000.0, 81),
        Grid::linspace(-500.0, 500.0, 41),
    )
    .unwrap();
    let model = WakeModel::new(&turbine(), decay());
    let regime = WindRegime::single(10.0, 270.0).unwrap();
    let field = model.field(&grid, &[Position::new(0.0, 0.0)], &regime).unwrap();
    let sampler = FieldSampler::new(&grid, field.speeds()).unwrap();

    let downstream = 10.0 - sampler.sample(Position::new(500.0, 0.0)).unwrap();
    let upstream = 10.0 - sampler.sample(Position::new(-500.0, 0.0)).unwrap();

    // 10 · (1 − √0.2) · (80 / 130)²
    assert!((downstream - 2.0934).abs() < 1e-4);
    assert!((downstream - jensen_deficit(10.0, 500.0)).abs() < 1e-12);
    assert_eq!(upstream, 0.0);
}
