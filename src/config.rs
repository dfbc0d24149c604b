// ---------------------------------------------------------------------------
// Compile-time defaults
// ---------------------------------------------------------------------------

/// Dataset read by the process-wide loader.
pub const DATA_PATH: &str = "data/website_emissions_summary.csv";

/// Presentation and selection defaults for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub window_title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// How many categories are pre-selected on startup.
    pub default_category_count: usize,
    pub chart_height: f32,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub legend_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "Website Emissions Dashboard".to_string(),
            inner_size: [1200.0, 800.0],
            min_inner_size: [600.0, 400.0],
            default_category_count: 3,
            chart_height: 320.0,
            x_axis_title: "Year".to_string(),
            y_axis_title: "Average Emissions (gCO2)".to_string(),
            legend_title: "Website Category".to_string(),
        }
    }
}
