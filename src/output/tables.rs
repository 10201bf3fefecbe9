use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::bamboo::BuildState;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_state_cell(state: &BuildState) -> Cell {
    let cell = Cell::new(state.as_str());
    match state {
        BuildState::Successful => cell.fg(TableColor::Green),
        BuildState::Failed => cell.fg(TableColor::Red),
        BuildState::Unknown | BuildState::Other(_) => cell.fg(TableColor::Yellow),
    }
}
