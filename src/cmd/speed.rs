use crate::reports;
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use vterm::analysis::estimate_terminal_velocity;
use vterm::config::PhysicsParams;
use vterm::error::VtResult;
use vterm::loader::load_run;
use vterm::render::render_speed_plot;
use vterm::render::speed_plot::DEFAULT_SPEED_PLOT;

/// The shared default mass is 1 kg; the reference terminal-velocity plot
/// uses a 10 kg projectile.
pub const MASS_NOTE: &str = "Note: --mass defaults to 1 kg (v_t ~ 9.9 m/s with --drag 0.1). \
The reference terminal-velocity plot uses --mass 10 (v_t ~ 31.3 m/s).";

#[derive(Args, Debug, Clone)]
pub struct SpeedArgs {
    #[command(flatten)]
    pub params: PhysicsParams,

    /// Run file to plot
    #[arg(short, long, default_value = "RKnDemo.csv")]
    pub run: PathBuf,

    /// Figure path; a `.svg` extension writes SVG, anything else PNG
    #[arg(short, long, default_value = DEFAULT_SPEED_PLOT)]
    pub output: PathBuf,

    /// Print the estimates without rendering the figure
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

pub fn run(args: SpeedArgs, params: &PhysicsParams) -> VtResult<()> {
    info!("📂 Loading run: {}", args.run.display());
    let run = load_run(&args.run)?;

    let tv = estimate_terminal_velocity(&run, params)?;
    reports::print_terminal_report(&tv);

    if !args.no_plot {
        render_speed_plot(&tv, &args.output)?;
    }
    Ok(())
}
