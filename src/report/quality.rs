//! Feature quality report table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{MetricValue, QualityReport};

/// IV at or above this is shown as strong
const STRONG_IV: f64 = 0.3;

/// IV below this is shown as weak
const WEAK_IV: f64 = 0.02;

fn metric_cell(value: &MetricValue) -> Cell {
    let cell = Cell::new(value.to_string()).set_alignment(CellAlignment::Right);
    match value {
        MetricValue::Value(_) => cell,
        MetricValue::Skipped | MetricValue::Unsupported => cell.fg(Color::DarkGrey),
    }
}

fn iv_cell(value: &MetricValue) -> Cell {
    match value.value() {
        Some(iv) if iv >= STRONG_IV => metric_cell(value)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(iv) if iv < WEAK_IV => metric_cell(value).fg(Color::Yellow),
        _ => metric_cell(value),
    }
}

/// Build the comfy-table for a quality report
pub fn quality_table(report: &QualityReport) -> Table {
    let with_ks = report.rows.iter().any(|r| r.ks.is_some());

    let mut header = vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("IV").add_attribute(Attribute::Bold),
        Cell::new("Gini").add_attribute(Attribute::Bold),
        Cell::new("Entropy").add_attribute(Attribute::Bold),
        Cell::new("Unique").add_attribute(Attribute::Bold),
    ];
    if with_ks {
        header.push(Cell::new("KS").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);

    for row in &report.rows {
        let mut cells = vec![
            Cell::new(&row.feature),
            Cell::new(row.kind.map_or_else(|| "unsupported".to_string(), |k| k.to_string())),
            iv_cell(&row.iv),
            metric_cell(&row.gini),
            metric_cell(&row.entropy),
            Cell::new(row.unique.map_or_else(|| "-".to_string(), |u| u.to_string()))
                .set_alignment(CellAlignment::Right),
        ];
        if with_ks {
            cells.push(metric_cell(&row.ks.unwrap_or(MetricValue::Skipped)));
        }
        table.add_row(cells);
    }

    table
}

/// Print the quality report
pub fn display_quality(report: &QualityReport) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("FEATURE QUALITY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    // Indent the table
    for line in quality_table(report).to_string().lines() {
        println!("    {}", line);
    }
}
