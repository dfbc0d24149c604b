use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{Record, YearRange};

// ---------------------------------------------------------------------------
// AggregatedGrid – dense (year, category) → mean emissions
// ---------------------------------------------------------------------------

/// Mean emissions for every `(year, category)` pair of the selection.
///
/// The grid is rectangular: each year of the range is paired with each
/// selected category exactly once, cells without source records hold `0.0`.
/// Each year stores one value per category, in [`categories`](Self::categories)
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedGrid {
    categories: Vec<String>,
    rows: BTreeMap<i32, Vec<f64>>,
    years: Vec<i32>,
}

impl AggregatedGrid {
    /// Years covered, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Categories covered, ascending.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn get(&self, year: i32, category: &str) -> Option<f64> {
        let col = self
            .categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .ok()?;
        self.rows.get(&year).map(|values| values[col])
    }

    /// Number of cells (`years × categories`).
    pub fn len(&self) -> usize {
        self.years.len() * self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells ordered by year, then category.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str, f64)> + '_ {
        self.rows.iter().flat_map(move |(year, values)| {
            self.categories
                .iter()
                .zip(values)
                .map(move |(category, value)| (*year, category.as_str(), *value))
        })
    }

    /// One table row: the value of every category for `year`, in
    /// [`categories`](Self::categories) order. Empty for years outside the grid.
    pub fn row(&self, year: i32) -> &[f64] {
        self.rows.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Aggregation stage
// ---------------------------------------------------------------------------

/// Group `records` by `(year, category)` and average their emissions over the
/// full `years × categories` cross-product.
///
/// Records outside the categories or the range are ignored. An empty category
/// set or an empty range produces an empty grid.
pub fn aggregate<'a, I>(
    records: I,
    categories: &BTreeSet<String>,
    years: YearRange,
) -> AggregatedGrid
where
    I: IntoIterator<Item = &'a Record>,
{
    if categories.is_empty() || years.is_empty() {
        return AggregatedGrid::default();
    }

    // (sum, count) per group
    let mut groups: HashMap<(i32, &str), (f64, usize)> = HashMap::new();
    for rec in records {
        if !years.contains(rec.year) || !categories.contains(&rec.category) {
            continue;
        }
        let slot = groups
            .entry((rec.year, rec.category.as_str()))
            .or_insert((0.0, 0));
        slot.0 += rec.emissions;
        slot.1 += 1;
    }

    let mut rows = BTreeMap::new();
    for year in years.years() {
        let mut values = Vec::with_capacity(categories.len());
        for category in categories {
            let mean = match groups.get(&(year, category.as_str())) {
                Some(&(sum, count)) if count > 0 => sum / count as f64,
                _ => 0.0,
            };
            values.push(mean);
        }
        rows.insert(year, values);
    }

    AggregatedGrid {
        categories: categories.iter().cloned().collect(),
        rows,
        years: years.years().collect(),
    }
}
