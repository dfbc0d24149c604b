use log::debug;

use super::aggregate::{aggregate, AggregatedGrid};
use super::filter::filter_records;
use super::model::{Dataset, FilterSelection};
use super::reshape::{reshape, ChartRow};

/// Everything the table and chart need for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Year-keyed table, one column per selected category.
    pub grid: AggregatedGrid,
    /// Long-form series for the chart.
    pub rows: Vec<ChartRow>,
    /// Source records that passed the filter.
    pub matched_records: usize,
}

/// Run filter → aggregate → reshape for `selection`.
pub fn build_view(dataset: &Dataset, selection: &FilterSelection) -> DashboardView {
    let filtered = filter_records(dataset.records(), selection);
    let grid = aggregate(filtered.iter().copied(), &selection.categories, selection.years);
    let rows = reshape(&grid);

    debug!(
        "Selection {:?} over {}: {} records → {} cells",
        selection.categories,
        selection.years,
        filtered.len(),
        grid.len()
    );

    DashboardView {
        matched_records: filtered.len(),
        grid,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, YearRange};

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new("A", 2020, 10.0),
            Record::new("A", 2021, 20.0),
            Record::new("B", 2020, 5.0),
            Record::new("C", 2020, 99.0),
            Record::new("A", 2019, 7.0),
        ])
    }

    #[test]
    fn builds_zero_filled_view() {
        let sel = FilterSelection::new(["A", "B"], YearRange::new(2020, 2021));
        let view = build_view(&dataset(), &sel);

        assert_eq!(view.matched_records, 3);
        assert_eq!(view.grid.years(), [2020, 2021]);
        assert_eq!(view.grid.row(2020), [10.0, 5.0]);
        assert_eq!(view.grid.row(2021), [20.0, 0.0]);
        assert_eq!(view.rows.len(), 4);
    }

    #[test]
    fn empty_selection_renders_nothing() {
        let sel = FilterSelection::new(Vec::<String>::new(), YearRange::new(2019, 2021));
        let view = build_view(&dataset(), &sel);
        assert_eq!(view, DashboardView::default());
    }

    #[test]
    fn range_beyond_data_is_flat_zero() {
        let sel = FilterSelection::new(["A"], YearRange::new(2030, 2031));
        let view = build_view(&dataset(), &sel);
        assert_eq!(view.matched_records, 0);
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|r| r.emissions == 0.0));
    }
}
