use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Year × category table
// ---------------------------------------------------------------------------

/// One row per year, one column per selected category.
pub fn emissions_table(ui: &mut Ui, state: &AppState) {
    let grid = &state.view.grid;

    if grid.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }

    let categories = grid.categories();
    let years = grid.years();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(90.0), categories.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(state.config.x_axis_title.as_str());
            });
            for category in categories {
                header.col(|ui| {
                    ui.strong(category.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, years.len(), |mut row| {
                let year = years[row.index()];
                row.col(|ui| {
                    ui.label(year.to_string());
                });
                for &value in grid.row(year) {
                    row.col(|ui| {
                        ui.label(format_cell(value));
                    });
                }
            });
        });
}

fn format_cell(value: f64) -> String {
    format!("{value:.2}")
}
