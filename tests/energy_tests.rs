use proptest::prelude::*;
use rstest::rstest;
use vterm::analysis::energy::{compute_deviation_summary, energy_series, ConvergenceDigest};
use vterm::config::PhysicsParams;
use vterm::error::VtermError;
use vterm::run::SimulationRun;
use vterm::simulate::{simulate, LaunchConditions};

const MASS: f64 = 1.0;
const G: f64 = 9.81;
const T: f64 = 20.0;

/// A run whose energy is `energy` at every sample: at rest at height energy / (m g).
fn constant_energy_run(step_count: usize, samples: usize, energy: f64) -> SimulationRun {
    let y = energy / (MASS * G);
    SimulationRun::new(
        step_count,
        vec![0.0; samples],
        vec![y; samples],
        vec![0.0; samples],
        vec![0.0; samples],
    )
}

#[test]
fn test_constant_energy_runs_sorted_by_step_size() {
    let runs = vec![
        constant_energy_run(100, 101, 5.0),
        constant_energy_run(1000, 1001, 5.0),
        constant_energy_run(10, 11, 5.0),
    ];

    let rows = compute_deviation_summary(&runs, MASS, G, T).unwrap();

    let expected = [(2.0, 10), (0.2, 100), (0.02, 1000)];
    let mut got: Vec<_> = rows.iter().map(|r| (r.step_size, r.step_count)).collect();
    got.reverse();
    assert_eq!(rows.len(), 3);
    for ((h, n), (eh, en)) in got.iter().zip(expected.iter()) {
        assert!((h - eh).abs() < 1e-12, "h={} expected {}", h, eh);
        assert_eq!(n, en);
    }
    assert!(rows.iter().all(|r| r.max_deviation == 0.0));
    assert!(rows[0].step_size < rows[1].step_size && rows[1].step_size < rows[2].step_size);
}

#[test]
fn test_single_run_energy_and_deviation() {
    let run = SimulationRun::new(
        2,
        vec![0.0, 0.0, 0.0],
        vec![0.0, 1.0, 2.0],
        vec![0.0, 0.0, 0.0],
        vec![0.0, -1.0, -2.0],
    );

    let energies = energy_series(&run, 1.0, 9.81).unwrap();
    let expected = [0.0, 10.31, 21.62];
    for (e, x) in energies.iter().zip(expected) {
        assert!((e - x).abs() < 1e-9, "E={} expected {}", e, x);
    }

    let rows = compute_deviation_summary(&[run], 1.0, 9.81, T).unwrap();
    assert_eq!(rows.len(), 1);
    assert!((rows[0].max_deviation - 21.62).abs() < 1e-9);
    assert_eq!(rows[0].step_size, 10.0);
}

#[rstest]
#[case::short_y(vec![0.0; 3], vec![0.0; 2], vec![0.0; 3], vec![0.0; 3])]
#[case::short_vx(vec![0.0; 3], vec![0.0; 3], vec![0.0; 1], vec![0.0; 3])]
#[case::empty_x(vec![], vec![0.0; 3], vec![0.0; 3], vec![0.0; 3])]
#[case::all_empty(vec![], vec![], vec![], vec![])]
fn test_malformed_run_fails_whole_summary(
    #[case] x: Vec<f64>,
    #[case] y: Vec<f64>,
    #[case] vx: Vec<f64>,
    #[case] vy: Vec<f64>,
) {
    let runs = vec![
        constant_energy_run(10, 11, 5.0),
        SimulationRun::new(50, x, y, vx, vy),
        constant_energy_run(100, 101, 5.0),
    ];

    let res = compute_deviation_summary(&runs, MASS, G, T);
    match res {
        Err(VtermError::InvalidRun { step_count, .. }) => assert_eq!(step_count, 50),
        other => panic!("expected InvalidRun, got {:?}", other),
    }
}

#[rstest]
#[case::nan_first_vx("vx", 0, f64::NAN)]
#[case::inf_y("y", 2, f64::INFINITY)]
#[case::neg_inf_vy("vy", 1, f64::NEG_INFINITY)]
#[case::nan_x("x", 2, f64::NAN)]
fn test_non_finite_sample_fails_whole_summary(
    #[case] channel: &str,
    #[case] index: usize,
    #[case] value: f64,
) {
    // Climbs from 0 to 10 m at constant speed: about 98 J of drift.
    let mut bad = SimulationRun::new(
        10,
        vec![0.0; 3],
        vec![0.0, 5.0, 10.0],
        vec![1.0; 3],
        vec![1.0; 3],
    );
    match channel {
        "x" => bad.x[index] = value,
        "y" => bad.y[index] = value,
        "vx" => bad.vx[index] = value,
        _ => bad.vy[index] = value,
    }
    let runs = vec![constant_energy_run(100, 101, 5.0), bad];

    match compute_deviation_summary(&runs, MASS, G, T) {
        Err(VtermError::InvalidRun { step_count, reason }) => {
            assert_eq!(step_count, 10);
            assert!(reason.contains(&format!("'{}'", channel)), "{}", reason);
            assert!(reason.contains(&format!("at {}", index)), "{}", reason);
        }
        other => panic!("expected InvalidRun, got {:?}", other),
    }
}

#[test]
fn test_time_channel_length_is_checked() {
    let run = constant_energy_run(10, 11, 5.0).with_time(vec![0.0; 4]);
    let res = compute_deviation_summary(&[run], MASS, G, T);
    assert!(matches!(res, Err(VtermError::InvalidRun { .. })));
}

#[test]
fn test_zero_step_count_is_invalid() {
    let run = constant_energy_run(0, 3, 5.0);
    let res = compute_deviation_summary(&[run], MASS, G, T);
    assert!(matches!(res, Err(VtermError::InvalidRun { step_count: 0, .. })));
}

#[rstest]
#[case(0.0, G, T)]
#[case(MASS, -9.81, T)]
#[case(MASS, G, 0.0)]
#[case(f64::NAN, G, T)]
fn test_non_positive_parameters_rejected(#[case] m: f64, #[case] g: f64, #[case] t: f64) {
    let runs = vec![constant_energy_run(10, 11, 5.0)];
    let res = compute_deviation_summary(&runs, m, g, t);
    assert!(matches!(res, Err(VtermError::Validation(_))));
}

#[test]
fn test_empty_run_collection_rejected() {
    let res = compute_deviation_summary(&[], MASS, G, T);
    assert!(matches!(res, Err(VtermError::Validation(_))));
}

#[test]
fn test_equal_step_sizes_keep_input_order() {
    let mut a = constant_energy_run(100, 3, 5.0);
    a.y[2] += 1.0;
    let b = constant_energy_run(100, 3, 5.0);

    let rows = compute_deviation_summary(&[a, b], MASS, G, T).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].max_deviation > 0.0);
    assert_eq!(rows[1].max_deviation, 0.0);
}

#[test]
fn test_summary_does_not_mutate_input_and_is_idempotent() {
    let runs = vec![
        constant_energy_run(20, 21, 3.0),
        SimulationRun::new(
            5,
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 0.5],
            vec![1.0, 1.0, 1.0],
            vec![2.0, 0.0, -2.0],
        ),
    ];
    let before = runs.clone();

    let first = compute_deviation_summary(&runs, MASS, G, T).unwrap();
    let second = compute_deviation_summary(&runs, MASS, G, T).unwrap();

    assert_eq!(first, second);
    assert_eq!(runs, before);
}

#[test]
fn test_drag_free_rk4_conserves_energy_at_every_step() {
    let params = PhysicsParams {
        drag: 0.0,
        ..Default::default()
    };
    let launch = LaunchConditions::default();

    let runs: Vec<_> = [10, 100, 1000]
        .iter()
        .map(|&n| simulate(&launch, &params, n, false).unwrap())
        .collect();

    let rows = compute_deviation_summary(&runs, params.mass, params.gravity, params.duration)
        .unwrap();

    for r in &rows {
        // |E| reaches ~1e4 J by the end of the fall; only round-off is left.
        assert!(r.max_deviation < 1e-6, "nsteps={} dev={}", r.step_count, r.max_deviation);
    }
}

#[test]
fn test_drag_deviation_converges_with_smaller_steps() {
    let params = PhysicsParams::default();
    let launch = LaunchConditions::default();

    let runs: Vec<_> = [100, 200, 400, 8000]
        .iter()
        .map(|&n| simulate(&launch, &params, n, false).unwrap())
        .collect();
    let rows = compute_deviation_summary(&runs, params.mass, params.gravity, params.duration)
        .unwrap();

    // rows[0] is the reference (smallest step).
    let reference = rows[0].max_deviation;
    let errors: Vec<f64> = rows[1..]
        .iter()
        .map(|r| (r.max_deviation - reference).abs())
        .collect();

    assert!(errors[0] < errors[1], "errors: {:?}", errors);
    assert!(errors[1] < errors[2], "errors: {:?}", errors);
}

#[test]
fn test_digest_reports_extremes_and_power_law_order() {
    let runs: Vec<_> = [10usize, 100, 1000]
        .iter()
        .map(|&n| {
            let h = T / n as f64;
            let mut run = constant_energy_run(n, 3, 5.0);
            // Deviation proportional to h^4.
            run.y[1] += 1e-3 * h.powi(4) / (MASS * G);
            run
        })
        .collect();

    let rows = compute_deviation_summary(&runs, MASS, G, T).unwrap();
    let digest = ConvergenceDigest::from_summary(&rows).unwrap();

    assert_eq!(digest.largest_step.step_count, 10);
    assert_eq!(digest.smallest_step.step_count, 1000);
    let order = digest.observed_order.unwrap();
    assert!((order - 4.0).abs() < 1e-3, "order={}", order);

    let text = digest.report_lines().join("\n");
    assert!(text.contains("Step sizes ranged from 2.0000s to 0.0200s"));
    assert!(text.contains("4th-order convergence"));
}

#[test]
fn test_digest_of_empty_summary_is_none() {
    assert!(ConvergenceDigest::from_summary(&[]).is_none());
}

prop_compose! {
    fn arb_run()(
        step_count in 1usize..5000,
        n in 1usize..40,
        seed in proptest::collection::vec(-50.0..50.0f64, 160)
    ) -> SimulationRun {
        SimulationRun::new(
            step_count,
            seed[0..n].to_vec(),
            seed[40..40 + n].to_vec(),
            seed[80..80 + n].to_vec(),
            seed[120..120 + n].to_vec(),
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_summary_sorted_and_non_negative(
        runs in proptest::collection::vec(arb_run(), 1..12),
        mass in 0.1..10.0f64,
        g in 1.0..20.0f64,
    ) {
        let rows = compute_deviation_summary(&runs, mass, g, T).unwrap();

        prop_assert_eq!(rows.len(), runs.len());
        for w in rows.windows(2) {
            prop_assert!(w[0].step_size <= w[1].step_size);
        }
        for r in &rows {
            prop_assert!(r.max_deviation >= 0.0);
            prop_assert!((r.step_size - T / r.step_count as f64).abs() < 1e-12);
        }
    }
}
