use crate::error::Result;
use crate::record::{normalize_key, Record, RecordSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Text some earlier writers stored for an empty cell.
const MISSING_SENTINEL: &str = "nan";

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// A record located by key, with its position in the set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub index: usize,
    pub record: &'a Record,
}

/// First record whose normalized key equals the normalized `query`.
///
/// An empty query never matches. `None` is an ordinary outcome (a mistyped
/// number), not an error.
pub fn find_record<'a>(records: &'a RecordSet, query: &str) -> Option<Match<'a>> {
    let query = normalize_key(query);
    if query.is_empty() {
        return None;
    }
    records
        .keys()
        .iter()
        .position(|k| *k == query)
        .map(|index| Match {
            index,
            record: &records.records()[index],
        })
}

// ---------------------------------------------------------------------------
// Option reconciliation
// ---------------------------------------------------------------------------

/// A selector's options and the index of its default selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    pub options: Vec<String>,
    pub index: usize,
}

impl OptionChoice {
    pub fn selected(&self) -> Option<&str> {
        self.options.get(self.index).map(String::as_str)
    }
}

fn is_absent(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(MISSING_SENTINEL)
}

/// Pick a default index into `options` for a record's current value.
///
/// Exact (case-sensitive) matches select the existing entry. A present value
/// missing from the list is appended so the selector can still show it. An
/// absent value selects the first option.
pub fn resolve_option_index(current: Option<&str>, options: &[String]) -> OptionChoice {
    let current = current.map(str::trim).unwrap_or("");
    if is_absent(current) {
        return OptionChoice {
            options: options.to_vec(),
            index: 0,
        };
    }
    if let Some(index) = options.iter().position(|o| o == current) {
        return OptionChoice {
            options: options.to_vec(),
            index,
        };
    }
    let mut options = options.to_vec();
    options.push(current.to_string());
    OptionChoice {
        index: options.len() - 1,
        options,
    }
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// The two fields a user can change on a work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditIntent {
    pub status: String,
    pub assigned_to: String,
}

impl EditIntent {
    pub fn field_updates(&self, status_column: &str, assignee_column: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            (status_column.to_string(), self.status.clone()),
            (assignee_column.to_string(), self.assigned_to.clone()),
        ])
    }
}

/// Overwrite the named fields of the record at `index`. Nothing else in the
/// set changes, and nothing is persisted.
pub fn apply_edit(
    records: &mut RecordSet,
    index: usize,
    field_updates: &BTreeMap<String, String>,
) -> Result<()> {
    // Validate every column first so a bad update leaves the set untouched.
    for column in field_updates.keys() {
        records.require_column(column)?;
    }
    for (column, value) in field_updates {
        records.set_field(index, column, Some(value.clone()))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Edit form
// ---------------------------------------------------------------------------

/// Everything a presenter needs to render the edit form for one work order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditForm {
    pub index: usize,
    pub record: Record,
    pub status: OptionChoice,
    pub assignee: OptionChoice,
}

pub fn prepare_edit(
    records: &RecordSet,
    query: &str,
    status_column: &str,
    assignee_column: &str,
    status_options: &[String],
    assignee_options: &[String],
) -> Option<EditForm> {
    let found = find_record(records, query)?;
    Some(EditForm {
        index: found.index,
        record: found.record.clone(),
        status: resolve_option_index(found.record.get(status_column), status_options),
        assignee: resolve_option_index(found.record.get(assignee_column), assignee_options),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WotrackError;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn work_orders(keys: &[&str]) -> RecordSet {
        let records = keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                Record::from_pairs([
                    ("WO Number", k.to_string()),
                    ("Status", "Pending".to_string()),
                    ("Client_Name_Display", format!("Client {i}")),
                ])
            })
            .collect();
        RecordSet::new(
            "WO_Log",
            opts(&["WO Number", "Status", "Client_Name_Display"]),
            records,
        )
    }

    #[test]
    fn find_in_empty_set_is_none() {
        let set = work_orders(&[]);
        assert!(find_record(&set, "1200").is_none());
    }

    #[test]
    fn empty_query_is_none() {
        let set = work_orders(&["1200", ""]);
        assert!(find_record(&set, "").is_none());
        assert!(find_record(&set, "   ").is_none());
    }

    #[test]
    fn find_normalizes_both_sides() {
        let set = work_orders(&["1200.0", "wo-867"]);
        assert_eq!(find_record(&set, " 1200 ").unwrap().index, 0);
        assert_eq!(find_record(&set, "WO-867").unwrap().index, 1);
        assert!(find_record(&set, "WO-868").is_none());
    }

    #[test]
    fn duplicate_keys_return_first() {
        let set = work_orders(&["WO-100", "WO-101", "WO-100"]);
        let found = find_record(&set, &normalize_key("WO-100")).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.record.get("Client_Name_Display"), Some("Client 0"));
    }

    #[test]
    fn resolve_existing_value() {
        let choice = resolve_option_index(Some("Pending"), &opts(&["Pending", "In progress"]));
        assert_eq!(choice.options, opts(&["Pending", "In progress"]));
        assert_eq!(choice.index, 0);
    }

    #[test]
    fn resolve_sentinel_is_absent() {
        for current in [Some("nan"), Some("NaN"), Some("  "), None] {
            let choice = resolve_option_index(current, &opts(&["Pending", "In progress"]));
            assert_eq!(choice.options, opts(&["Pending", "In progress"]));
            assert_eq!(choice.index, 0, "for {current:?}");
        }
    }

    #[test]
    fn resolve_appends_unknown_value() {
        let choice = resolve_option_index(Some("Contractor X"), &opts(&["Admin", "Unassigned"]));
        assert_eq!(choice.options, opts(&["Admin", "Unassigned", "Contractor X"]));
        assert_eq!(choice.index, 2);
        assert_eq!(choice.selected(), Some("Contractor X"));
    }

    #[test]
    fn resolve_trims_before_matching() {
        let choice = resolve_option_index(Some(" In progress "), &opts(&["Pending", "In progress"]));
        assert_eq!(choice.index, 1);
        assert_eq!(choice.options.len(), 2);
    }

    #[test]
    fn resolve_is_case_sensitive() {
        let choice = resolve_option_index(
            Some("pending"),
            &opts(&["Pending", "In progress", "Completed"]),
        );
        assert_eq!(choice.index, 3);
        assert_eq!(choice.selected(), Some("pending"));
    }

    #[test]
    fn resolve_absent_with_no_options() {
        let choice = resolve_option_index(None, &[]);
        assert_eq!(choice.index, 0);
        assert_eq!(choice.selected(), None);
    }

    #[test]
    fn apply_edit_touches_only_named_fields() {
        let mut set = work_orders(&["1", "2", "3"]);
        let before = set.clone();
        let updates = BTreeMap::from([("Status".to_string(), "Completed".to_string())]);
        apply_edit(&mut set, 1, &updates).unwrap();

        assert_eq!(set.records()[0], before.records()[0]);
        assert_eq!(set.records()[2], before.records()[2]);
        let edited = &set.records()[1];
        assert_eq!(edited.get("Status"), Some("Completed"));
        assert_eq!(edited.get("WO Number"), Some("2"));
        assert_eq!(edited.get("Client_Name_Display"), Some("Client 1"));
    }

    #[test]
    fn apply_edit_unknown_column_leaves_set_untouched() {
        let mut set = work_orders(&["1"]);
        let before = set.clone();
        let updates = BTreeMap::from([
            ("Status".to_string(), "Completed".to_string()),
            ("Priority".to_string(), "High".to_string()),
        ]);
        let err = apply_edit(&mut set, 0, &updates).unwrap_err();
        assert!(matches!(err, WotrackError::MissingColumn { .. }));
        assert_eq!(set, before);
    }

    #[test]
    fn prepare_edit_end_to_end() {
        let set = RecordSet::new(
            "WO_Log",
            opts(&["WO Number", "Status", "Assigned To"]),
            vec![Record::from_pairs([
                ("WO Number", "1200"),
                ("Status", "pending"),
                ("Assigned To", ""),
            ])],
        );
        let statuses = opts(&["Pending", "In progress", "Completed"]);
        let assignees = opts(&["Admin", "Unassigned"]);
        let form = prepare_edit(&set, "1200", "Status", "Assigned To", &statuses, &assignees)
            .expect("work order 1200 should match");

        assert_eq!(form.index, 0);
        // exact matching only: lowercase "pending" is carried as its own option
        assert_eq!(form.status.index, 3);
        assert_eq!(form.status.options.len(), 4);
        assert_eq!(form.assignee.index, 0);
        assert_eq!(form.assignee.selected(), Some("Admin"));
    }

    #[test]
    fn field_updates_use_configured_columns() {
        let intent = EditIntent {
            status: "Completed".into(),
            assigned_to: "Ada".into(),
        };
        let updates = intent.field_updates("State", "Owner");
        assert_eq!(updates.get("State").map(String::as_str), Some("Completed"));
        assert_eq!(updates.get("Owner").map(String::as_str), Some("Ada"));
    }
}
