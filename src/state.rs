use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::loader::DatasetLoader;
use crate::data::model::{Dataset, FilterSelection, YearRange};
use crate::data::pipeline::{build_view, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None if loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Current category set and year interval.
    pub selection: FilterSelection,

    /// Table and chart data for `selection` (cached until the next change).
    pub view: DashboardView,

    /// Category colours, fixed for the dataset.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            selection: FilterSelection::new(Vec::<String>::new(), YearRange::new(0, -1)),
            view: DashboardView::default(),
            color_map: None,
            status_message: None,
        }
    }

    /// Build the state from the (memoized) loader; a load failure is kept as
    /// the status message.
    pub fn from_loader(config: DashboardConfig, loader: &DatasetLoader) -> Self {
        let mut state = Self::new(config);
        match loader.load() {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
        state
    }

    /// Ingest a dataset, apply the default selection and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::default_for(&dataset, self.config.default_category_count);
        self.color_map = Some(ColorMap::new(dataset.categories()));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Re-run the pipeline after a selection change.
    pub fn recompute(&mut self) {
        if let Some(ds) = &self.dataset {
            self.view = build_view(ds, &self.selection);
        }
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.recompute();
    }

    /// Select every category of the dataset.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.categories = ds.categories().iter().cloned().collect();
            self.recompute();
        }
    }

    /// Deselect all categories.
    pub fn select_none(&mut self) {
        self.selection.categories.clear();
        self.recompute();
    }

    /// Move the lower year bound; the upper bound follows so that from ≤ to.
    pub fn set_year_start(&mut self, year: i32) {
        self.selection.years.start = year;
        if self.selection.years.end < year {
            self.selection.years.end = year;
        }
        self.recompute();
    }

    /// Move the upper year bound; the lower bound follows so that from ≤ to.
    pub fn set_year_end(&mut self, year: i32) {
        self.selection.years.end = year;
        if self.selection.years.start > year {
            self.selection.years.start = year;
        }
        self.recompute();
    }

    /// Back to the default selection.
    pub fn reset_selection(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = FilterSelection::default_for(ds, self.config.default_category_count);
            self.recompute();
        }
    }
}
