use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::ops::RangeInclusive;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single emissions measurement. Extra source columns are dropped on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub category: String,
    pub year: i32,
    /// Grams of CO2, non-negative by convention.
    pub emissions: f64,
}

impl Record {
    pub fn new(category: impl Into<String>, year: i32, emissions: f64) -> Self {
        Self {
            category: category.into(),
            year,
            emissions,
        }
    }
}

// ---------------------------------------------------------------------------
// YearRange – closed integer interval
// ---------------------------------------------------------------------------

/// Closed `[start, end]` interval of years. `start > end` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Every integer year in the interval, ascending.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category and year indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    /// Distinct categories in first-seen order.
    categories: Vec<String>,
    year_bounds: Option<YearRange>,
}

impl Dataset {
    /// Build indices from the loaded records; record order is kept as-is.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut categories = Vec::new();
        let mut year_bounds: Option<YearRange> = None;

        for rec in &records {
            if seen.insert(rec.category.as_str()) {
                categories.push(rec.category.clone());
            }
            year_bounds = Some(match year_bounds {
                None => YearRange::new(rec.year, rec.year),
                Some(b) => YearRange::new(b.start.min(rec.year), b.end.max(rec.year)),
            });
        }

        Dataset {
            records,
            categories,
            year_bounds,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Observed `[min, max]` year, `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – what the user picked
// ---------------------------------------------------------------------------

/// Selected categories plus an inclusive year interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub years: YearRange,
}

impl FilterSelection {
    pub fn new<I, S>(categories: I, years: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// The first `count` categories in dataset order over the full year span.
    pub fn default_for(dataset: &Dataset, count: usize) -> Self {
        let years = dataset
            .year_bounds()
            .unwrap_or_else(|| YearRange::new(0, -1));
        Self::new(dataset.categories().iter().take(count).cloned(), years)
    }
}
