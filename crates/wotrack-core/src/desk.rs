//! One interaction cycle over the work-order sheet: fetch, look up,
//! reconcile, and write back.
//!
//! Every call re-reads the sheet. Saves overwrite the whole sheet, so two
//! people saving at once silently keep whichever write lands last.

use crate::active::{active_rows, ActiveRow};
use crate::config::Config;
use crate::error::{Result, WotrackError};
use crate::reconcile::{apply_edit, find_record, prepare_edit, EditForm, EditIntent};
use crate::record::{Record, RecordSet};
use crate::roster::load_assignee_options;
use crate::store::{open_store, RecordStore};
use serde::Serialize;
use std::path::Path;

/// A saved edit: the row as written and its position in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedEdit {
    pub index: usize,
    pub record: Record,
}

pub struct Desk {
    config: Config,
    store: Box<dyn RecordStore>,
}

impl Desk {
    pub fn new(config: Config, store: Box<dyn RecordStore>) -> Self {
        Self { config, store }
    }

    /// Load `.wotrack/config.yaml` under `root` and open its store.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        let store = open_store(root, &config)?;
        Ok(Self::new(config, store))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the work-order sheet, keyed and checked for the columns an edit
    /// needs.
    pub fn load_work_orders(&self) -> Result<RecordSet> {
        let fields = &self.config.fields;
        let set = self
            .store
            .read(&self.config.sheets.work_orders)?
            .with_key_column(fields.key.as_str());
        for column in [&fields.key, &fields.status, &fields.assignee] {
            set.require_column(column)?;
        }
        Ok(set)
    }

    pub fn assignee_options(&self) -> Vec<String> {
        load_assignee_options(
            self.store.as_ref(),
            &self.config.sheets.roster,
            &self.config.roster_fallback,
        )
    }

    /// The edit form for `query`, or `None` when no work order matches.
    pub fn lookup(&self, query: &str) -> Result<Option<EditForm>> {
        let set = self.load_work_orders()?;
        let assignees = self.assignee_options();
        let fields = &self.config.fields;
        Ok(prepare_edit(
            &set,
            query,
            &fields.status,
            &fields.assignee,
            &self.config.status_options,
            &assignees,
        ))
    }

    /// Apply `intent` to the work order matching `query` and write the whole
    /// sheet back.
    pub fn save(&self, query: &str, intent: &EditIntent) -> Result<SavedEdit> {
        let mut set = self.load_work_orders()?;
        let index = find_record(&set, query)
            .map(|m| m.index)
            .ok_or_else(|| WotrackError::WorkOrderNotFound(query.trim().to_string()))?;

        let fields = &self.config.fields;
        let updates = intent.field_updates(&fields.status, &fields.assignee);
        apply_edit(&mut set, index, &updates)?;
        self.store.write(&self.config.sheets.work_orders, &set)?;

        let record = set.records()[index].clone();
        tracing::info!(
            work_order = record.get(&fields.key).unwrap_or(""),
            status = %intent.status,
            assigned_to = %intent.assigned_to,
            "saved work order"
        );
        Ok(SavedEdit { index, record })
    }

    /// Active work orders projected onto the key, display, status and
    /// assignee columns.
    pub fn active(&self) -> Result<Vec<ActiveRow>> {
        let set = self.load_work_orders()?;
        let columns = self.listing_columns();
        let fields = &self.config.fields;
        Ok(active_rows(&set, &fields.status, &fields.assignee, &columns))
    }

    pub fn listing_columns(&self) -> Vec<String> {
        let fields = &self.config.fields;
        std::iter::once(fields.key.clone())
            .chain(fields.display.iter().cloned())
            .chain([fields.status.clone(), fields.assignee.clone()])
            .collect()
    }
}

/// Fill unspecified fields of an edit from the form's default selections.
///
/// An empty assignee has no current value to keep, so its default is the
/// first assignee option.
pub fn intent_from_form(
    form: &EditForm,
    status: Option<String>,
    assigned_to: Option<String>,
) -> EditIntent {
    EditIntent {
        status: status.unwrap_or_else(|| form.status.selected().unwrap_or("").to_string()),
        assigned_to: assigned_to
            .unwrap_or_else(|| form.assignee.selected().unwrap_or("").to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
