use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{uniform_grid_spacer, Legend, Line, Plot, PlotPoints};

use crate::data::reshape::ChartRow;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Emissions line chart (central panel)
// ---------------------------------------------------------------------------

/// Render one line per category: year on x, mean emissions on y.
pub fn emissions_chart(ui: &mut Ui, state: &AppState) {
    let config = &state.config;

    if state.view.rows.is_empty() {
        ui.label("No categories selected.");
        return;
    }

    let series = group_series(&state.view.rows);

    Plot::new("emissions_chart")
        .legend(Legend::default())
        .height(config.chart_height)
        .x_axis_label(config.x_axis_title.clone())
        .y_axis_label(config.y_axis_title.clone())
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(|mark, _range| year_label(mark.value))
        .label_formatter(|name, value| tooltip_text(name, value.x, value.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(category))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let line = Line::new(PlotPoints::from(points))
                    .name(category)
                    .color(color)
                    .width(2.0);

                plot_ui.line(line);
            }
        });
}

/// Split long-form rows into per-category point lists, ordered by year.
pub fn group_series(rows: &[ChartRow]) -> BTreeMap<&str, Vec<[f64; 2]>> {
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for row in rows {
        series
            .entry(row.category.as_str())
            .or_default()
            .push([row.year as f64, row.emissions]);
    }
    for points in series.values_mut() {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
    series
}

/// Years are ordinal: only whole values get a tick label.
fn year_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        String::new()
    }
}

fn tooltip_text(category: &str, year: f64, emissions: f64) -> String {
    if category.is_empty() {
        format!("Year: {year:.0}\nEmissions: {emissions:.3}")
    } else {
        format!("Year: {year:.0}\nCategory: {category}\nEmissions: {emissions:.3}")
    }
}
