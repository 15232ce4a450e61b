//! Per-repository run summary, rendered to stderr so stdout stays
//! machine-readable.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dbgap_core::RepositoryStats;

pub fn print_run_summary(stats: &[RepositoryStats]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Repository"),
        header_cell("Branch"),
        header_cell("Data dictionaries"),
        header_cell("Sections"),
        header_cell("Variables"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_dictionaries = 0usize;
    let mut total_sections = 0usize;
    let mut total_variables = 0usize;
    for entry in stats {
        total_dictionaries += entry.data_dictionaries;
        total_sections += entry.sections;
        total_variables += entry.variables;
        table.add_row(vec![
            Cell::new(&entry.repository)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.branch),
            Cell::new(entry.data_dictionaries),
            Cell::new(entry.sections),
            Cell::new(entry.variables),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(total_dictionaries).add_attribute(Attribute::Bold),
        Cell::new(total_sections).add_attribute(Attribute::Bold),
        Cell::new(total_variables).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
