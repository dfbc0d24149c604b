use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            if let Some(bounds) = dataset.year_bounds() {
                ui.strong("Select Year Range");
                let mut start = state.selection.years.start;
                let mut end = state.selection.years.end;
                if ui
                    .add(egui::Slider::new(&mut start, bounds.years()).text("From"))
                    .changed()
                {
                    state.set_year_start(start);
                }
                if ui
                    .add(egui::Slider::new(&mut end, bounds.years()).text("To"))
                    .changed()
                {
                    state.set_year_end(end);
                }
                ui.separator();
            }

            // ---- Categories ----
            let n_selected = state.selection.categories.len();
            let n_total = dataset.categories().len();
            ui.strong(format!(
                "{}  ({n_selected}/{n_total})",
                state.config.legend_title
            ));

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
                if ui.small_button("Reset").clicked() {
                    state.reset_selection();
                }
            });

            for category in dataset.categories() {
                let mut checked = state.selection.categories.contains(category);

                let mut text = RichText::new(category);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(category));
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(category);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and dataset summary.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(format!("🌿 {}", state.config.window_title));

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching",
                ds.len(),
                state.view.matched_records
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    ui.label(
        "Website emissions from Lighthouse carbon metrics. \
         Pick categories and a year range on the left.",
    );
}
