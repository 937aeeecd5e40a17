pub mod energy_plot;
pub mod pdf;
pub mod speed_plot;

use crate::analysis::energy::DeviationSummary;
use crate::analysis::terminal::TerminalVelocity;
use crate::error::{VtResult, VtermError};
use std::error::Error;
use std::path::Path;
use tracing::info;

pub use self::pdf::{combine_images_to_pdf, CombineSummary};

type PlotResult = Result<(), Box<dyn Error>>;

/// Figures go to SVG when the output path ends in `.svg`, PNG otherwise.
fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn plot_error(path: &Path, e: Box<dyn Error>) -> VtermError {
    VtermError::Plot(format!("{}: {}", path.display(), e))
}

/// Log-log deviation plot with the textual convergence analysis underneath.
pub fn render_energy_analysis<P: AsRef<Path>>(
    rows: &[DeviationSummary],
    out_path: P,
) -> VtResult<()> {
    let out_path = out_path.as_ref();
    if rows.is_empty() {
        return Err(VtermError::Validation(
            "nothing to plot: empty deviation summary".to_string(),
        ));
    }
    energy_plot::draw(out_path, rows).map_err(|e| plot_error(out_path, e))?;
    info!("📈 Combined plot saved as {}", out_path.display());
    Ok(())
}

/// Speed vs time with both terminal-velocity estimates.
pub fn render_speed_plot<P: AsRef<Path>>(tv: &TerminalVelocity, out_path: P) -> VtResult<()> {
    let out_path = out_path.as_ref();
    if tv.speed.is_empty() || tv.speed.len() != tv.time.len() {
        return Err(VtermError::Validation(format!(
            "speed plot needs matching time/speed series, got {}/{}",
            tv.time.len(),
            tv.speed.len()
        )));
    }
    speed_plot::draw(out_path, tv).map_err(|e| plot_error(out_path, e))?;
    info!("📈 Plot saved as {}", out_path.display());
    Ok(())
}
