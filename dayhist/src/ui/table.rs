// dayhist/src/ui/table.rs
//! Tabular rendering of computed sensor values.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use dayhist_core::{HeadlessResult, Reading};

use super::theme::{table_color, ThemeEntry, ThemeMap};

/// Builds a table with one row per computed sensor.
///
/// Styling is only emitted when stdout is a terminal.
pub fn results_table(results: &[HeadlessResult], theme: &ThemeMap) -> Table {
    let header = table_color(theme, ThemeEntry::Header);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Sensor", "Source", "Value", "Samples"]
                .into_iter()
                .map(|title| Cell::new(title).fg(header)),
        );

    for item in results {
        let descriptor = &item.descriptor;
        let (value_cell, samples) = match &item.result {
            Ok(value) => {
                let cell = match value.value {
                    Reading::Value(_) => {
                        Cell::new(value.to_string()).fg(table_color(theme, ThemeEntry::Success))
                    }
                    Reading::Unknown => {
                        Cell::new("unknown").fg(table_color(theme, ThemeEntry::Unknown))
                    }
                };
                (cell, value.sample_count.to_string())
            }
            Err(e) => (
                Cell::new(format!("error: {}", e)).fg(table_color(theme, ThemeEntry::Error)),
                "-".to_string(),
            ),
        };
        table.add_row(vec![
            Cell::new(&descriptor.name),
            Cell::new(&descriptor.source_entity_id),
            value_cell,
            Cell::new(samples),
        ]);
    }
    table
}
