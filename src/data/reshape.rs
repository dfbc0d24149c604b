use super::aggregate::AggregatedGrid;

/// One point of the long-form chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub year: i32,
    pub category: String,
    pub emissions: f64,
}

/// Flatten the grid into one [`ChartRow`] per cell, in grid order.
pub fn reshape(grid: &AggregatedGrid) -> Vec<ChartRow> {
    grid.iter()
        .map(|(year, category, emissions)| ChartRow {
            year,
            category: category.to_string(),
            emissions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::model::{Record, YearRange};

    fn grid() -> AggregatedGrid {
        let recs = vec![
            Record::new("A", 2020, 10.0),
            Record::new("A", 2020, 11.0),
            Record::new("A", 2021, 20.0),
            Record::new("B", 2020, 5.0),
            Record::new("C", 2022, 0.25),
        ];
        let cats: BTreeSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        aggregate(&recs, &cats, YearRange::new(2020, 2022))
    }

    #[test]
    fn one_row_per_cell() {
        let g = grid();
        let rows = reshape(&g);
        assert_eq!(rows.len(), g.len());
        assert_eq!(
            rows[0],
            ChartRow {
                year: 2020,
                category: "A".into(),
                emissions: 10.5,
            }
        );
    }

    #[test]
    fn reaggregating_rows_reproduces_grid() {
        let g = grid();
        let back: Vec<Record> = reshape(&g)
            .into_iter()
            .map(|r| Record::new(r.category, r.year, r.emissions))
            .collect();
        let cats: BTreeSet<String> = g.categories().iter().cloned().collect();
        let range = YearRange::new(g.years()[0], *g.years().last().unwrap());
        assert_eq!(aggregate(&back, &cats, range), g);
    }

    #[test]
    fn empty_grid_reshapes_to_nothing() {
        assert!(reshape(&AggregatedGrid::default()).is_empty());
    }
}
