use eframe::egui::{self, RichText};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EmissionsApp {
    pub state: AppState,
}

impl EmissionsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EmissionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart above table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                let msg = self
                    .state
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "No dataset loaded.".to_string());
                ui.centered_and_justified(|ui| {
                    ui.heading(RichText::new(msg).color(egui::Color32::RED));
                });
                return;
            }

            plot::emissions_chart(ui, &self.state);
            ui.separator();
            table::emissions_table(ui, &self.state);
        });
    }
}
