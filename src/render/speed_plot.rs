use super::PlotResult;
use crate::analysis::terminal::TerminalVelocity;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const DEFAULT_SPEED_PLOT: &str = "projectile_speed_terminal_velocity.png";

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

pub fn annotations(tv: &TerminalVelocity) -> [String; 2] {
    [
        format!("v_t numerical = {:.3} m/s", tv.numerical),
        format!("v_t analytical = {:.3} m/s", tv.analytical),
    ]
}

pub(super) fn draw(out_path: &Path, tv: &TerminalVelocity) -> PlotResult {
    if super::is_svg(out_path) {
        let root = SVGBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
        draw_on(&root, tv)?;
        root.present()?;
    } else {
        let root = BitMapBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
        draw_on(&root, tv)?;
        root.present()?;
    }
    Ok(())
}

fn draw_on<DB>(root: &DrawingArea<DB, Shift>, tv: &TerminalVelocity) -> PlotResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let t_start = tv.time.first().copied().unwrap_or(0.0);
    let t_end = tv.time.last().copied().unwrap_or(1.0).max(t_start + 1e-9);

    let v_max = tv
        .speed
        .iter()
        .copied()
        .chain([tv.analytical, tv.numerical])
        .fold(0.0f64, f64::max)
        .max(1e-9)
        * 1.1;

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption("Projectile speed |v| vs time", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(t_start..t_end, 0.0..v_max)?;

    chart
        .configure_mesh()
        .x_desc("t [s]")
        .y_desc("|v| [m/s]")
        .draw()?;

    let blue = BLUE.stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            tv.time.iter().copied().zip(tv.speed.iter().copied()),
            blue,
        ))?
        .label("|v| vs t")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], blue));

    let red = RED.stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            [(t_start, tv.analytical), (t_end, tv.analytical)],
            10,
            6,
            red,
        ))?
        .label("Analytical v_t")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], red));

    let green = RGBColor(0, 140, 0).stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            [(t_start, tv.numerical), (t_end, tv.numerical)],
            3,
            4,
            green,
        ))?
        .label("Numerical v_t")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], green));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    let style = TextStyle::from(("sans-serif", 18).into_font()).color(&BLACK);
    let [numerical, analytical] = annotations(tv);
    root.draw_text(&numerical, &style, (110, 60))?;
    root.draw_text(&analytical, &style, (110, 85))?;
    Ok(())
}
