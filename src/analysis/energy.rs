use crate::error::{VtResult, VtermError};
use crate::run::SimulationRun;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Maximum energy drift of one run, keyed by its step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviationSummary {
    pub step_size: f64,
    pub max_deviation: f64,
    pub step_count: usize,
}

/// Total mechanical energy per sample: `0.5 m |v|^2 + m g y`.
pub fn energy_series(run: &SimulationRun, mass: f64, gravity: f64) -> VtResult<Vec<f64>> {
    run.validate()?;
    Ok(run
        .vx
        .iter()
        .zip(&run.vy)
        .zip(&run.y)
        .map(|((&vx, &vy), &y)| 0.5 * mass * (vx * vx + vy * vy) + mass * gravity * y)
        .collect())
}

/// `max_i |E_i - E_0|`. Zero for a single sample or an empty series.
pub fn max_deviation(energies: &[f64]) -> f64 {
    let Some(&e0) = energies.first() else {
        return 0.0;
    };
    energies
        .iter()
        .map(|e| (e - e0).abs())
        .fold(0.0, f64::max)
}

fn summarize_run(
    run: &SimulationRun,
    mass: f64,
    gravity: f64,
    duration: f64,
) -> VtResult<DeviationSummary> {
    if run.step_count == 0 {
        return Err(VtermError::InvalidRun {
            step_count: 0,
            reason: "step count must be positive".to_string(),
        });
    }

    let energies = energy_series(run, mass, gravity)?;
    let summary = DeviationSummary {
        step_size: duration / run.step_count as f64,
        max_deviation: max_deviation(&energies),
        step_count: run.step_count,
    };

    debug!(
        "nsteps={} h={:.6} samples={} max|dE|={:.6e}",
        summary.step_count,
        summary.step_size,
        energies.len(),
        summary.max_deviation
    );

    Ok(summary)
}

/// Energy deviation of every run, sorted ascending by step size.
///
/// Runs are analysed independently (in parallel) and only combined once all
/// of them succeeded: a single run that breaks the channel-length invariant
/// fails the whole call and no partial summary is produced. Equal step sizes
/// keep their input order.
pub fn compute_deviation_summary(
    runs: &[SimulationRun],
    mass: f64,
    gravity: f64,
    duration: f64,
) -> VtResult<Vec<DeviationSummary>> {
    if runs.is_empty() {
        return Err(VtermError::Validation(
            "energy analysis needs at least one run".to_string(),
        ));
    }
    for (name, value) in [("mass", mass), ("gravity", gravity), ("duration", duration)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(VtermError::Validation(format!(
                "{} must be a finite value > 0, got {}",
                name, value
            )));
        }
    }

    let mut rows = runs
        .par_iter()
        .map(|run| summarize_run(run, mass, gravity, duration))
        .collect::<VtResult<Vec<_>>>()?;

    rows.sort_by(|a, b| a.step_size.total_cmp(&b.step_size));
    Ok(rows)
}

/// Headline numbers of a sorted summary, as printed under the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceDigest {
    pub smallest_step: DeviationSummary,
    pub largest_step: DeviationSummary,
    /// Slope of ln(max|dE|) against ln(h), when it can be estimated.
    pub observed_order: Option<f64>,
}

impl ConvergenceDigest {
    /// `None` for an empty summary.
    pub fn from_summary(rows: &[DeviationSummary]) -> Option<Self> {
        let smallest_step = *rows
            .iter()
            .min_by(|a, b| a.step_size.total_cmp(&b.step_size))?;
        let largest_step = *rows
            .iter()
            .max_by(|a, b| a.step_size.total_cmp(&b.step_size))?;

        Some(Self {
            smallest_step,
            largest_step,
            observed_order: observed_order(rows),
        })
    }

    pub fn improves_with_smaller_steps(&self) -> bool {
        self.smallest_step.max_deviation < self.largest_step.max_deviation
    }

    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "--- Energy Conservation Analysis ---".to_string(),
            format!(
                "Step sizes ranged from {:.4}s to {:.4}s",
                self.largest_step.step_size, self.smallest_step.step_size
            ),
            format!(
                "Maximum energy deviation with largest step: {:.6} J",
                self.largest_step.max_deviation
            ),
            format!(
                "Maximum energy deviation with smallest step: {:.6} J",
                self.smallest_step.max_deviation
            ),
        ];
        if let Some(order) = self.observed_order {
            lines.push(format!("Observed convergence order: {:.2}", order));
        }
        lines.push("Observation:".to_string());
        lines.extend(self.observations().into_iter().map(|o| format!("- {}", o)));
        lines
    }

    pub fn observations(&self) -> Vec<String> {
        let largest = self.largest_step.max_deviation;
        let smallest = self.smallest_step.max_deviation;

        if largest == smallest {
            return vec!["Energy deviation does not depend on the step size.".to_string()];
        }
        if !self.improves_with_smaller_steps() {
            return vec![
                "Smaller step sizes did not reduce the energy deviation.".to_string(),
                "Check the integrator or the run files.".to_string(),
            ];
        }

        let mut notes = vec![
            "Energy is very well conserved for small step sizes.".to_string(),
            "Larger step sizes produce larger numerical deviations.".to_string(),
        ];
        match self.observed_order {
            Some(order) if (3.5..=4.5).contains(&order) => notes.push(
                "Reducing RK4 step size improves accuracy, consistent with 4th-order convergence."
                    .to_string(),
            ),
            Some(order) => notes.push(format!(
                "Reducing the step size improves accuracy (observed order {:.1}).",
                order
            )),
            None => notes.push("Reducing the step size improves accuracy.".to_string()),
        }
        notes
    }
}

/// Least-squares slope of ln(max|dE|) against ln(h) over rows with a positive
/// deviation.
pub fn observed_order(rows: &[DeviationSummary]) -> Option<f64> {
    let points: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r.max_deviation > 0.0 && r.step_size > 0.0)
        .map(|r| (r.step_size.ln(), r.max_deviation.ln()))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    Some(sxy / sxx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(step_size: f64, max_deviation: f64, step_count: usize) -> DeviationSummary {
        DeviationSummary {
            step_size,
            max_deviation,
            step_count,
        }
    }

    #[test]
    fn test_max_deviation_uses_first_sample_as_reference() {
        assert_eq!(max_deviation(&[2.0, 1.0, 5.0, 2.5]), 3.0);
        assert_eq!(max_deviation(&[7.0]), 0.0);
        assert_eq!(max_deviation(&[]), 0.0);
    }

    #[test]
    fn test_observed_order_of_power_law() {
        // dev = 3 h^4
        let rows: Vec<_> = [0.5, 0.25, 0.125, 0.0625]
            .iter()
            .map(|&h| row(h, 3.0 * h * h * h * h, 0))
            .collect();
        let order = observed_order(&rows).unwrap();
        assert!((order - 4.0).abs() < 1e-9, "order was {}", order);
    }

    #[test]
    fn test_observed_order_needs_two_positive_points() {
        let rows = vec![row(0.1, 0.0, 200), row(1.0, 1e-3, 20)];
        assert_eq!(observed_order(&rows), None);

        let same_h = vec![row(0.1, 1e-3, 200), row(0.1, 2e-3, 200)];
        assert_eq!(observed_order(&same_h), None);
    }

    #[test]
    fn test_flat_deviation_is_reported_as_step_independent() {
        let digest =
            ConvergenceDigest::from_summary(&[row(0.02, 0.0, 1000), row(2.0, 0.0, 10)]).unwrap();
        assert!(!digest.improves_with_smaller_steps());
        assert_eq!(digest.observations().len(), 1);
        assert!(digest.observations()[0].contains("does not depend"));
    }
}
