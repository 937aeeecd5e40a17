use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vterm::config::PhysicsParams;
use vterm::error::VtResult;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with physical parameters; explicit flags override it
    #[arg(global = true, long)]
    params: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Integrate projectile runs with RK4 and write them as CSV
    Simulate(cmd::simulate::SimulateArgs),
    /// Energy deviation vs step size across runs
    Energy(cmd::energy::EnergyArgs),
    /// Speed vs time with terminal velocity estimates
    #[command(after_help = cmd::speed::MASS_NOTE)]
    Speed(cmd::speed::SpeedArgs),
    /// Merge PNG pages into one PDF
    Combine(cmd::combine::CombineArgs),
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_params(
    params_path: Option<&str>,
    cli_params: &PhysicsParams,
    sub_matches: &clap::ArgMatches,
) -> VtResult<PhysicsParams> {
    let Some(path) = params_path else {
        return Ok(cli_params.clone());
    };

    info!("⚖️  Loading parameters from: {}", path);
    let mut params = PhysicsParams::load_from_file(path)?;
    params.merge_from_cli(cli_params, sub_matches);
    Ok(params)
}

fn execute(cli: Cli, matches: &clap::ArgMatches) -> VtResult<()> {
    let params_path = cli.params.as_deref();

    match cli.command {
        Commands::Simulate(args) => {
            let sub = matches.subcommand_matches("simulate").unwrap_or(matches);
            let params = resolve_params(params_path, &args.params, sub)?;
            params.validate()?;
            cmd::simulate::run(args, &params)
        }
        Commands::Energy(args) => {
            let sub = matches.subcommand_matches("energy").unwrap_or(matches);
            let params = resolve_params(params_path, &args.params, sub)?;
            params.validate()?;
            cmd::energy::run(args, &params)
        }
        Commands::Speed(args) => {
            let sub = matches.subcommand_matches("speed").unwrap_or(matches);
            let params = resolve_params(params_path, &args.params, sub)?;
            params.validate()?;
            cmd::speed::run(args, &params)
        }
        Commands::Combine(args) => {
            if params_path.is_some() {
                warn!("⚠️  --params has no effect on 'combine'");
            }
            cmd::combine::run(args)
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.debug);

    if let Err(e) = execute(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
