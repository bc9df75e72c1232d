//! VIF table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::VifEntry;

/// VIF above this is commonly read as problematic collinearity
const HIGH_VIF: f64 = 10.0;

/// Build the comfy-table for VIF entries
pub fn vif_table(entries: &[VifEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("VIF").add_attribute(Attribute::Bold),
    ]);

    for entry in entries {
        let text = if entry.vif.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.4}", entry.vif)
        };
        let color = if entry.vif > HIGH_VIF {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(&entry.feature),
            Cell::new(text)
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

pub fn display_vif(entries: &[VifEntry]) {
    println!();
    println!(
        "    {} {}",
        style("🔗").cyan(),
        style("VARIANCE INFLATION").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    for line in vif_table(entries).to_string().lines() {
        println!("    {}", line);
    }
}
