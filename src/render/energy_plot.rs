use super::PlotResult;
use crate::analysis::energy::{ConvergenceDigest, DeviationSummary};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const DEFAULT_ENERGY_PLOT: &str = "energy_analysis_combined.png";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 1200;
/// Upper panel share of the figure height (3:1 plot/text split).
const PLOT_HEIGHT: u32 = HEIGHT * 3 / 4;

/// A log axis cannot place zero; exactly conserved runs are drawn here.
pub const LOG_FLOOR: f64 = 1e-16;

/// Points as drawn on the log-log axes.
pub fn plot_points(rows: &[DeviationSummary]) -> Vec<(f64, f64, usize)> {
    rows.iter()
        .map(|r| (r.step_size, r.max_deviation.max(LOG_FLOOR), r.step_count))
        .collect()
}

/// Axis range padded by a quarter decade on each side.
pub fn log_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (LOG_FLOOR, 1.0);
    }
    let pad = 10f64.powf(0.25);
    let (lo, hi) = (lo / pad, hi * pad);
    if hi / lo < 10.0 {
        let mid = (lo * hi).sqrt();
        (mid / 10f64.sqrt(), mid * 10f64.sqrt())
    } else {
        (lo, hi)
    }
}

pub(super) fn draw(out_path: &Path, rows: &[DeviationSummary]) -> PlotResult {
    if super::is_svg(out_path) {
        let root = SVGBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
        draw_on(&root, rows)?;
        root.present()?;
    } else {
        let root = BitMapBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
        draw_on(&root, rows)?;
        root.present()?;
    }
    Ok(())
}

fn draw_on<DB>(root: &DrawingArea<DB, Shift>, rows: &[DeviationSummary]) -> PlotResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points = plot_points(rows);
    let (x_min, x_max) = log_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = log_range(points.iter().map(|p| p.1));

    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(PLOT_HEIGHT);

    let mut chart = ChartBuilder::on(&upper)
        .caption("Energy Conservation vs RK4 Step Size", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("RK4 step size h [s]")
        .y_desc("Max |E - E0| [J]")
        .light_line_style(BLACK.mix(0.08))
        .bold_line_style(BLACK.mix(0.2))
        .x_label_formatter(&|v| format!("{:.0e}", v))
        .y_label_formatter(&|v| format!("{:.0e}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|&(h, d, _)| (h, d)),
        &BLUE,
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(h, d, _)| Circle::new((h, d), 6, BLUE.filled())),
    )?;
    chart.draw_series(points.iter().map(|&(h, d, n)| {
        Text::new(n.to_string(), (h * 1.05, d * 1.05), ("sans-serif", 16).into_font())
    }))?;

    if let Some(digest) = ConvergenceDigest::from_summary(rows) {
        let style = TextStyle::from(("monospace", 20).into_font()).color(&BLACK);
        for (i, line) in digest.report_lines().iter().enumerate() {
            lower.draw_text(line, &style, (50, 10 + i as i32 * 26))?;
        }
    }

    Ok(())
}
