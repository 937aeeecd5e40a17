use crate::config::PhysicsParams;
use crate::error::{VtResult, VtermError};
use crate::run::SimulationRun;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// State layout: `[x, vx, y, vy]`.
pub type State = [f64; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchConditions {
    /// Launch speed [m/s]
    pub speed: f64,
    /// Launch angle above horizontal [deg]
    pub angle_deg: f64,
    /// Release height [m]
    pub height: f64,
}

impl Default for LaunchConditions {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle_deg: 45.0,
            height: 0.0,
        }
    }
}

impl LaunchConditions {
    pub fn initial_state(&self) -> State {
        let theta = self.angle_deg.to_radians();
        [
            0.0,
            self.speed * theta.cos(),
            self.height,
            self.speed * theta.sin(),
        ]
    }
}

/// Projectile under gravity with quadratic drag `F = k |v|^2`.
pub fn derivatives(state: &State, params: &PhysicsParams) -> State {
    let [_, vx, _, vy] = *state;
    let v = (vx * vx + vy * vy).sqrt();
    let drag = params.drag / params.mass;
    [vx, -drag * v * vx, vy, -drag * v * vy - params.gravity]
}

/// One classical fourth-order Runge-Kutta step.
pub fn rk4_step(state: &State, h: f64, params: &PhysicsParams) -> State {
    let shifted = |base: &State, k: &State, scale: f64| -> State {
        let mut out = *base;
        for (o, dk) in out.iter_mut().zip(k) {
            *o += scale * dk;
        }
        out
    };

    let k1 = derivatives(state, params);
    let k2 = derivatives(&shifted(state, &k1, 0.5 * h), params);
    let k3 = derivatives(&shifted(state, &k2, 0.5 * h), params);
    let k4 = derivatives(&shifted(state, &k3, h), params);

    let mut next = *state;
    let slopes = k1.iter().zip(&k2).zip(&k3).zip(&k4);
    for (n, (((a, b), c), d)) in next.iter_mut().zip(slopes) {
        *n += h / 6.0 * (a + 2.0 * b + 2.0 * c + d);
    }
    next
}

/// Integrates `nsteps` fixed steps over `params.duration`, recording the
/// initial state and every step. With `ground_stop` the run ends after the
/// first sample below `y = 0`.
pub fn simulate(
    launch: &LaunchConditions,
    params: &PhysicsParams,
    nsteps: usize,
    ground_stop: bool,
) -> VtResult<SimulationRun> {
    params.validate()?;
    if nsteps == 0 {
        return Err(VtermError::Validation(
            "nsteps must be positive".to_string(),
        ));
    }

    let h = params.step_size(nsteps);
    let mut state = launch.initial_state();
    let mut t = 0.0;

    let mut run = SimulationRun {
        step_count: nsteps,
        ..Default::default()
    };
    let record = |run: &mut SimulationRun, t: f64, s: &State| {
        run.time.push(t);
        run.x.push(s[0]);
        run.vx.push(s[1]);
        run.y.push(s[2]);
        run.vy.push(s[3]);
    };

    record(&mut run, t, &state);
    for i in 1..=nsteps {
        state = rk4_step(&state, h, params);
        t = i as f64 * h;
        record(&mut run, t, &state);
        if ground_stop && state[2] < 0.0 {
            debug!("nsteps={} hit the ground at t={:.4}", nsteps, t);
            break;
        }
    }

    Ok(run)
}

pub fn run_file_name(prefix: &str, nsteps: usize) -> String {
    format!("{}{}.csv", prefix, nsteps)
}

/// Writes a run in the layout [`crate::loader::load_run`] reads.
pub fn write_run_csv<W: Write>(run: &SimulationRun, writer: W) -> VtResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for sample in run.samples() {
        wtr.serialize(sample)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Simulates every step count and writes `<prefix><N>.csv` into `out_dir`.
pub fn write_step_sweep<P: AsRef<Path>>(
    out_dir: P,
    prefix: &str,
    step_counts: &[usize],
    launch: &LaunchConditions,
    params: &PhysicsParams,
    ground_stop: bool,
) -> VtResult<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(step_counts.len());
    for &nsteps in step_counts {
        let run = simulate(launch, params, nsteps, ground_stop)?;
        let path = out_dir.join(run_file_name(prefix, nsteps));
        write_run_csv(&run, File::create(&path)?)?;
        info!("💾 Wrote {} ({} samples)", path.display(), run.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_is_exact_for_free_fall() {
        // Quadratic trajectory: RK4 integrates it without truncation error.
        let params = PhysicsParams {
            drag: 0.0,
            duration: 2.0,
            ..Default::default()
        };
        let launch = LaunchConditions {
            speed: 0.0,
            angle_deg: 0.0,
            height: 100.0,
        };
        let run = simulate(&launch, &params, 4, false).unwrap();
        let y_end = *run.y.last().unwrap();
        let expected = 100.0 - 0.5 * 9.81 * 4.0;
        assert!((y_end - expected).abs() < 1e-9, "y_end = {}", y_end);
    }

    #[test]
    fn test_single_step_updates_every_component() {
        let params = PhysicsParams {
            drag: 0.0,
            ..Default::default()
        };
        let next = rk4_step(&[1.0, 1.0, 0.0, 2.0], 0.5, &params);

        let expected = [1.5, 1.0, 1.0 - 0.5 * 9.81 * 0.25, 2.0 - 9.81 * 0.5];
        for (got, want) in next.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{:?} vs {:?}", next, expected);
        }
    }

    #[test]
    fn test_drag_step_slows_horizontal_motion() {
        let params = PhysicsParams::default();
        let next = rk4_step(&[0.0, 10.0, 0.0, 0.0], 0.01, &params);
        // Without gravity vx(t) = v0 / (1 + (k/m) v0 t).
        let expected = 10.0 / (1.0 + 0.1 * 10.0 * 0.01);
        assert!((next[1] - expected).abs() < 1e-4, "vx = {}", next[1]);
        assert!(next[3] < 0.0);
    }

    #[test]
    fn test_ground_stop_ends_below_zero() {
        let params = PhysicsParams::default();
        let run = simulate(&LaunchConditions::default(), &params, 2000, true).unwrap();
        assert!(run.len() < 2001);
        assert!(*run.y.last().unwrap() < 0.0);
        assert!(run.y[run.len() - 2] >= 0.0);
    }
}
