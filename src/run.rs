use crate::error::{VtResult, VtermError};
use serde::{Deserialize, Serialize};

/// One row of a run file, in the order the integrator records its state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSample {
    pub t: f64,
    pub x: f64,
    pub vx: f64,
    pub y: f64,
    pub vy: f64,
}

/// A recorded trajectory from one simulation execution.
///
/// Channels are stored column-wise. Construction does not enforce equal
/// lengths; [`SimulationRun::validate`] does, and the analyzers call it before
/// touching the data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationRun {
    pub step_count: usize,
    /// Sample times. Empty when the source did not record them.
    pub time: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
}

impl SimulationRun {
    pub fn new(step_count: usize, x: Vec<f64>, y: Vec<f64>, vx: Vec<f64>, vy: Vec<f64>) -> Self {
        Self {
            step_count,
            time: Vec::new(),
            x,
            y,
            vx,
            vy,
        }
    }

    pub fn with_time(mut self, time: Vec<f64>) -> Self {
        self.time = time;
        self
    }

    pub fn from_samples(step_count: usize, samples: &[RunSample]) -> Self {
        let n = samples.len();
        let mut run = Self {
            step_count,
            time: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            vx: Vec::with_capacity(n),
            vy: Vec::with_capacity(n),
        };
        for s in samples {
            run.time.push(s.t);
            run.x.push(s.x);
            run.y.push(s.y);
            run.vx.push(s.vx);
            run.vy.push(s.vy);
        }
        run
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn has_time(&self) -> bool {
        !self.time.is_empty()
    }

    /// Checks the channel-length invariant: x, y, vx, vy share one non-zero
    /// length, the time channel is either absent or the same length, and every
    /// position and velocity sample is finite.
    pub fn validate(&self) -> VtResult<usize> {
        let channels = [
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("vx", self.vx.len()),
            ("vy", self.vy.len()),
        ];

        if let Some((name, _)) = channels.iter().find(|(_, len)| *len == 0) {
            return Err(self.invalid(format!("channel '{}' is empty", name)));
        }

        let n = self.x.len();
        if channels.iter().any(|(_, len)| *len != n) {
            let lens: Vec<String> = channels
                .iter()
                .map(|(name, len)| format!("{}={}", name, len))
                .collect();
            return Err(self.invalid(format!("channel lengths differ ({})", lens.join(", "))));
        }

        if self.has_time() && self.time.len() != n {
            return Err(self.invalid(format!(
                "time channel has {} samples, expected {}",
                self.time.len(),
                n
            )));
        }

        for (name, values) in [("x", &self.x), ("y", &self.y), ("vx", &self.vx), ("vy", &self.vy)] {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(self.invalid(format!(
                    "channel '{}' has a non-finite sample at {}",
                    name, i
                )));
            }
        }

        Ok(n)
    }

    fn invalid(&self, reason: String) -> VtermError {
        VtermError::InvalidRun {
            step_count: self.step_count,
            reason,
        }
    }

    /// Row view of the channels. Stops at the shortest channel; call
    /// [`SimulationRun::validate`] first when that matters. Missing times are
    /// replaced by the sample index.
    pub fn samples(&self) -> impl Iterator<Item = RunSample> + '_ {
        self.x
            .iter()
            .zip(&self.vx)
            .zip(&self.y)
            .zip(&self.vy)
            .enumerate()
            .map(move |(i, (((&x, &vx), &y), &vy))| RunSample {
                t: self.time.get(i).copied().unwrap_or(i as f64),
                x,
                vx,
                y,
                vy,
            })
    }
}
