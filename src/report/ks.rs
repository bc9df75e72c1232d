//! KS bucket table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::KsTable;

fn bound(value: Option<f64>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| format!("{:.4}", v))
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{:.4}", value)).set_alignment(CellAlignment::Right)
}

/// Build the comfy-table for a KS bucket table, highlighting the peak row
pub fn ks_table(table: &KsTable) -> Table {
    let peak = table.ks();

    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(
        [
            "Min", "Max", "Pos", "Neg", "Total", "Pos rate", "Cum pos %", "Cum neg %", "KS",
            "Lift", "Cum lift",
        ]
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect::<Vec<_>>(),
    );

    for row in &table.rows {
        let ks_cell = if row.ks == peak && peak > 0.0 {
            number(row.ks).fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            number(row.ks)
        };
        out.add_row(vec![
            Cell::new(bound(row.min)),
            Cell::new(bound(row.max)),
            Cell::new(row.positives).set_alignment(CellAlignment::Right),
            Cell::new(row.negatives).set_alignment(CellAlignment::Right),
            Cell::new(row.total).set_alignment(CellAlignment::Right),
            number(row.positive_rate),
            number(row.cum_positive_prop),
            number(row.cum_negative_prop),
            ks_cell,
            number(row.lift),
            number(row.cum_lift),
        ]);
    }

    out
}

/// Print the KS table of one feature
pub fn display_ks(feature: &str, table: &KsTable) {
    println!();
    println!(
        "    {} {} {}",
        style("📈").cyan(),
        style("KS BUCKETS").white().bold(),
        style(format!("({})", feature)).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    for line in ks_table(table).to_string().lines() {
        println!("    {}", line);
    }
    println!();
    println!(
        "    KS = {}",
        style(format!("{:.6}", table.ks())).yellow().bold()
    );
}
