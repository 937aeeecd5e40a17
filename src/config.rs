use crate::error::{VtResult, VtermError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Physical constants of a projectile scenario.
///
/// Every analysis takes these explicitly; nothing in the crate falls back to
/// module-level constants.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Projectile mass [kg]
    #[arg(long, default_value_t = 1.0)]
    pub mass: f64,
    /// Gravitational acceleration [m/s^2]
    #[arg(long, default_value_t = 9.81)]
    pub gravity: f64,
    /// Total simulated duration T [s], used to derive h = T / nsteps
    #[arg(long, default_value_t = 20.0)]
    pub duration: f64,
    /// Quadratic drag coefficient k [kg/m], F = k v^2
    #[arg(long, default_value_t = 0.1)]
    pub drag: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 9.81,
            duration: 20.0,
            drag: 0.1,
        }
    }
}

impl PhysicsParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> VtResult<Self> {
        let content = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&content)?;
        Ok(params)
    }

    /// Overlays the values the user typed on the command line. Defaults filled
    /// in by clap do not override values loaded from a file.
    pub fn merge_from_cli(&mut self, cli_params: &PhysicsParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_params.$field;
                }
            };
        }

        update_if_present!(mass, "mass");
        update_if_present!(gravity, "gravity");
        update_if_present!(duration, "duration");
        update_if_present!(drag, "drag");
    }

    /// Mass, gravity and duration must be strictly positive. Drag may be zero.
    pub fn validate(&self) -> VtResult<()> {
        check_positive("mass", self.mass)?;
        check_positive("gravity", self.gravity)?;
        check_positive("duration", self.duration)?;
        if !self.drag.is_finite() || self.drag < 0.0 {
            return Err(VtermError::Config(format!(
                "drag must be a finite value >= 0, got {}",
                self.drag
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn step_size(&self, step_count: usize) -> f64 {
        self.duration / step_count as f64
    }
}

fn check_positive(name: &str, value: f64) -> VtResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VtermError::Config(format!(
            "{} must be a finite value > 0, got {}",
            name, value
        )))
    }
}

/// Parses a comma separated list such as `10,100,1000`.
pub fn parse_usize_list(s: &str, name: &str) -> VtResult<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<usize>().map_err(|_| {
                VtermError::Config(format!("Invalid number '{}' in --{}", p, name))
            })
        })
        .collect()
}
