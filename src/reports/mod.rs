use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::path::PathBuf;
use vterm::analysis::{ConvergenceDigest, DeviationSummary, TerminalVelocity};

pub fn print_deviation_report(rows: &[DeviationSummary]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("nsteps").add_attribute(Attribute::Bold),
        Cell::new("h [s]"),
        Cell::new("Max |E - E0| [J]").fg(Color::Cyan),
    ]);

    for i in 0..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in rows {
        table.add_row(vec![
            Cell::new(r.step_count).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.6}", r.step_size)),
            Cell::new(format!("{:.6e}", r.max_deviation)),
        ]);
    }
    println!("\n{}", table);

    if let Some(digest) = ConvergenceDigest::from_summary(rows) {
        println!();
        for line in digest.report_lines() {
            println!("{}", line);
        }
    }
}

pub fn print_skipped_report(skipped: &[(PathBuf, String)]) {
    if skipped.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Skipped file").add_attribute(Attribute::Bold).fg(Color::Yellow),
        Cell::new("Reason"),
    ]);
    for (path, reason) in skipped {
        table.add_row(vec![
            Cell::new(path.display()),
            Cell::new(reason),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_terminal_report(tv: &TerminalVelocity) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Terminal velocity").add_attribute(Attribute::Bold),
        Cell::new("m/s"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let err = tv.relative_error() * 100.0;
    let err_cell = if err < 1.0 {
        Cell::new(format!("{:.2}%", err)).fg(Color::Green)
    } else if err < 5.0 {
        Cell::new(format!("{:.2}%", err)).fg(Color::Yellow)
    } else {
        Cell::new(format!("{:.2}%", err)).fg(Color::Red)
    };

    table.add_row(vec![
        Cell::new("Numerical (last 10%)"),
        Cell::new(format!("{:.3}", tv.numerical)),
    ]);
    table.add_row(vec![
        Cell::new("Analytical sqrt(mg/k)"),
        Cell::new(format!("{:.3}", tv.analytical)),
    ]);
    table.add_row(vec![Cell::new("Relative difference"), err_cell]);

    println!("\n{}", table);
}
