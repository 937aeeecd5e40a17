use crate::config::PhysicsParams;
use crate::error::{VtResult, VtermError};
use crate::run::SimulationRun;
use serde::Serialize;

/// Fraction of the trajectory, counted from the end, averaged for the
/// numerical terminal velocity.
pub const TAIL_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalVelocity {
    /// `sqrt(m g / k)`
    pub analytical: f64,
    /// Mean speed over the tail of the run.
    pub numerical: f64,
    pub time: Vec<f64>,
    pub speed: Vec<f64>,
}

impl TerminalVelocity {
    pub fn relative_error(&self) -> f64 {
        (self.numerical - self.analytical).abs() / self.analytical
    }
}

pub fn speed_series(run: &SimulationRun) -> VtResult<Vec<f64>> {
    run.validate()?;
    Ok(run
        .vx
        .iter()
        .zip(&run.vy)
        .map(|(vx, vy)| (vx * vx + vy * vy).sqrt())
        .collect())
}

pub fn analytical_terminal_velocity(params: &PhysicsParams) -> VtResult<f64> {
    if !(params.drag.is_finite() && params.drag > 0.0) {
        return Err(VtermError::Config(format!(
            "terminal velocity needs drag > 0, got {}",
            params.drag
        )));
    }
    if !(params.mass > 0.0 && params.gravity > 0.0) {
        return Err(VtermError::Config(
            "terminal velocity needs mass > 0 and gravity > 0".to_string(),
        ));
    }
    Ok((params.mass * params.gravity / params.drag).sqrt())
}

/// Mean of `speeds[floor(0.9 N)..N]`, which always holds at least one sample.
pub fn numerical_terminal_velocity(speeds: &[f64]) -> VtResult<f64> {
    if speeds.is_empty() {
        return Err(VtermError::Validation(
            "cannot estimate terminal velocity from an empty speed series".to_string(),
        ));
    }
    let n = speeds.len();
    let start = ((1.0 - TAIL_FRACTION) * n as f64).floor() as usize;
    let start = start.min(n - 1);
    let tail = &speeds[start..];
    Ok(tail.iter().sum::<f64>() / tail.len() as f64)
}

pub fn estimate_terminal_velocity(
    run: &SimulationRun,
    params: &PhysicsParams,
) -> VtResult<TerminalVelocity> {
    let speed = speed_series(run)?;
    let analytical = analytical_terminal_velocity(params)?;
    let numerical = numerical_terminal_velocity(&speed)?;

    let time = if run.has_time() {
        run.time.clone()
    } else {
        let h = params.step_size(run.step_count.max(1));
        (0..speed.len()).map(|i| i as f64 * h).collect()
    };

    Ok(TerminalVelocity {
        analytical,
        numerical,
        time,
        speed,
    })
}
