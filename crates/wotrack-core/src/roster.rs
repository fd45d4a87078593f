//! Staff roster used to populate the assignee selector.

use crate::error::Result;
use crate::record::RecordSet;
use crate::store::RecordStore;
use std::collections::BTreeSet;

const NAME_COLUMN: &str = "name";

/// Staff names from a roster sheet, in sheet order.
///
/// The name column is found case-insensitively. Empty cells are skipped and
/// repeated names are kept once.
pub fn roster_names(roster: &RecordSet) -> Option<Vec<String>> {
    let column = roster
        .columns()
        .iter()
        .find(|c| c.trim().eq_ignore_ascii_case(NAME_COLUMN))?;

    let mut seen = BTreeSet::new();
    let names = roster
        .records()
        .iter()
        .filter_map(|r| r.get(column))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.to_string()))
        .map(str::to_string)
        .collect();
    Some(names)
}

/// Sorted union of `fallback` and `names`.
pub fn assignee_options(fallback: &[String], names: &[String]) -> Vec<String> {
    fallback
        .iter()
        .chain(names)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Assignee options read from the roster sheet.
///
/// Never fails: an unreadable sheet or one without a `name` column yields
/// `fallback` alone.
pub fn load_assignee_options(
    store: &dyn RecordStore,
    sheet: &str,
    fallback: &[String],
) -> Vec<String> {
    let roster: Result<RecordSet> = store.read(sheet);
    let names = match roster {
        Ok(set) => match roster_names(&set) {
            Some(names) => names,
            None => {
                tracing::warn!(sheet, "roster has no 'name' column; using fallback list");
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!(sheet, error = %e, "roster unavailable; using fallback list");
            Vec::new()
        }
    };
    assignee_options(fallback, &names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
