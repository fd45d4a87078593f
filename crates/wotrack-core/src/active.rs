//! The "active tasks" listing: work orders someone still has to act on.

use crate::record::{Record, RecordSet};
use serde::Serialize;

const OPEN_STATUSES: [&str; 2] = ["pending", "in progress"];
const CLOSED_STATUSES: [&str; 2] = ["completed", "cancelled"];
const UNASSIGNED: [&str; 2] = ["nan", "unassigned"];

fn lower_trim(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_lowercase()
}

/// Whether a work order belongs in the active listing.
///
/// Open statuses and unassigned orders are active unless the status says the
/// order is closed. Comparisons ignore case and surrounding whitespace.
pub fn is_active(record: &Record, status_column: &str, assignee_column: &str) -> bool {
    let status = lower_trim(record.get(status_column));
    let assignee = lower_trim(record.get(assignee_column));

    let open = OPEN_STATUSES.contains(&status.as_str());
    let unassigned = assignee.is_empty() || UNASSIGNED.contains(&assignee.as_str());
    let closed = CLOSED_STATUSES.contains(&status.as_str());

    (open || unassigned) && !closed
}

/// One row of the active listing, projected onto the display columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveRow {
    pub index: usize,
    pub cells: Vec<(String, Option<String>)>,
}

impl ActiveRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Active work orders in sheet order, each projected onto `columns`.
/// Columns the sheet lacks come back empty.
pub fn active_rows(
    records: &RecordSet,
    status_column: &str,
    assignee_column: &str,
    columns: &[String],
) -> Vec<ActiveRow> {
    records
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| is_active(r, status_column, assignee_column))
        .map(|(index, r)| ActiveRow {
            index,
            cells: columns
                .iter()
                .map(|c| (c.clone(), r.get(c).map(str::to_string)))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
