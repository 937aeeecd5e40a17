use crate::reports;
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use vterm::analysis::compute_deviation_summary;
use vterm::config::PhysicsParams;
use vterm::error::{VtResult, VtermError};
use vterm::loader::{discover_runs, DEFAULT_RUN_PREFIX};
use vterm::render::energy_plot::DEFAULT_ENERGY_PLOT;
use vterm::render::render_energy_analysis;

#[derive(Args, Debug, Clone)]
pub struct EnergyArgs {
    #[command(flatten)]
    pub params: PhysicsParams,

    /// Directory holding the run files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    #[arg(long, default_value = DEFAULT_RUN_PREFIX)]
    pub prefix: String,

    /// Figure path; a `.svg` extension writes SVG, anything else PNG
    #[arg(short, long, default_value = DEFAULT_ENERGY_PLOT)]
    pub output: PathBuf,

    /// Print the summary without rendering the figure
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

pub fn run(args: EnergyArgs, params: &PhysicsParams) -> VtResult<()> {
    info!("🔬 === ENERGY CONSERVATION ANALYSIS === 🔬");

    let report = discover_runs(&args.dir, &args.prefix)?;
    reports::print_skipped_report(&report.skipped);

    if report.runs.is_empty() {
        return Err(VtermError::Validation(format!(
            "no usable run files matching '{}*nsteps*.csv' in {}",
            args.prefix,
            args.dir.display()
        )));
    }

    let rows = compute_deviation_summary(
        &report.runs,
        params.mass,
        params.gravity,
        params.duration,
    )?;
    reports::print_deviation_report(&rows);

    if !args.no_plot {
        render_energy_analysis(&rows, &args.output)?;
    }
    Ok(())
}
