use clap::Args;
use std::path::PathBuf;
use tracing::info;
use vterm::config::{parse_usize_list, PhysicsParams};
use vterm::error::VtResult;
use vterm::loader::DEFAULT_RUN_PREFIX;
use vterm::simulate::{write_step_sweep, LaunchConditions};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub params: PhysicsParams,

    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_RUN_PREFIX)]
    pub prefix: String,

    /// Comma separated step counts, one run file each
    #[arg(short, long, default_value = "10,20,50,100,200,500,1000")]
    pub steps: String,

    /// Launch speed [m/s]
    #[arg(long, default_value_t = 20.0)]
    pub v0: f64,

    /// Launch angle above horizontal [deg]
    #[arg(long, default_value_t = 45.0)]
    pub angle: f64,

    /// Release height [m]
    #[arg(long, default_value_t = 0.0)]
    pub y0: f64,

    /// Stop each run after the first sample below the ground
    #[arg(long, default_value_t = false)]
    pub ground_stop: bool,
}

pub fn run(args: SimulateArgs, params: &PhysicsParams) -> VtResult<()> {
    let step_counts = parse_usize_list(&args.steps, "steps")?;
    let launch = LaunchConditions {
        speed: args.v0,
        angle_deg: args.angle,
        height: args.y0,
    };

    info!(
        "🎯 Simulating {} runs: v0={} m/s, angle={}°, k={}",
        step_counts.len(),
        launch.speed,
        launch.angle_deg,
        params.drag
    );

    let written = write_step_sweep(
        &args.out_dir,
        &args.prefix,
        &step_counts,
        &launch,
        params,
        args.ground_stop,
    )?;

    info!("🏁 Wrote {} run files to {}", written.len(), args.out_dir.display());
    Ok(())
}
