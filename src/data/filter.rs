use super::model::{FilterSelection, Record};

// ---------------------------------------------------------------------------
// Filter stage: category membership + inclusive year interval
// ---------------------------------------------------------------------------

/// Return the records that pass the selection, in input order.
///
/// A record passes when:
/// * its category is one of `selection.categories`
/// * its year lies in `selection.years` (both ends inclusive)
///
/// An empty category set selects nothing.
pub fn filter_records<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    if selection.categories.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|rec| {
            selection.years.contains(rec.year) && selection.categories.contains(&rec.category)
        })
        .collect()
}
