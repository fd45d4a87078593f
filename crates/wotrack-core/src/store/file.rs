use super::RecordStore;
use crate::error::{Result, WotrackError};
use crate::paths;
use crate::record::{Cell, RecordSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk layout of one sheet: a header row and positional rows.
#[derive(Debug, Serialize, Deserialize)]
struct SheetFile {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

/// Local workbook: one YAML file per sheet under `.wotrack/sheets/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Create an empty sheet with the given header if none exists yet.
    pub fn seed(&self, sheet: &str, columns: &[&str]) -> Result<bool> {
        paths::validate_sheet_name(sheet)?;
        let file = SheetFile {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        };
        let data = serde_yaml::to_string(&file)?;
        crate::io::write_if_missing(&paths::sheet_path(&self.root, sheet), data.as_bytes())
    }
}

impl RecordStore for FileStore {
    fn read(&self, sheet: &str) -> Result<RecordSet> {
        paths::validate_sheet_name(sheet)?;
        let path = paths::sheet_path(&self.root, sheet);
        if !path.exists() {
            return Err(WotrackError::SheetNotFound(sheet.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let file: SheetFile = serde_yaml::from_str(&data)?;
        tracing::debug!(sheet, rows = file.rows.len(), "read local sheet");
        let set = RecordSet::from_grid(sheet, file.columns, file.rows);
        set.require_unique_columns()?;
        Ok(set)
    }

    fn write(&self, sheet: &str, records: &RecordSet) -> Result<()> {
        paths::validate_sheet_name(sheet)?;
        let (columns, rows) = records.to_grid();
        let file = SheetFile { columns, rows };
        let data = serde_yaml::to_string(&file)?;
        crate::io::atomic_write(&paths::sheet_path(&self.root, sheet), data.as_bytes())?;
        tracing::debug!(sheet, rows = records.len(), "wrote local sheet");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_keeps_order_and_nulls() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let set = RecordSet::from_grid(
            "WO_Log",
            vec!["WO Number".into(), "Status".into(), "Assigned To".into()],
            vec![
                vec![Some("1200".into()), Some("Pending".into()), None],
                vec![Some("WO-867".into()), Some("Completed".into()), Some("Ada".into())],
            ],
        );
        store.write("WO_Log", &set).unwrap();

        let back = store.read("WO_Log").unwrap();
        assert_eq!(back.columns(), set.columns());
        assert_eq!(back.records(), set.records());
        assert_eq!(back.records()[0].get("Assigned To"), None);
    }

    #[test]
    fn read_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.read("users"),
            Err(WotrackError::SheetNotFound(s)) if s == "users"
        ));
    }

    #[test]
    fn reads_hand_written_yaml() {
        let dir = TempDir::new().unwrap();
        let path = paths::sheet_path(dir.path(), "users");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "columns: [' Name ', Role]\nrows:\n  - [Ada, tech]\n  - [~, admin]\n")
            .unwrap();

        let set = FileStore::new(dir.path()).read("users").unwrap();
        assert_eq!(set.columns(), ["Name", "Role"]);
        assert_eq!(set.records()[1].get("Name"), None);
    }

    #[test]
    fn repeated_header_fails_the_read() {
        let dir = TempDir::new().unwrap();
        let path = paths::sheet_path(dir.path(), "WO_Log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "columns: [WO Number, Status, Status]\nrows:\n  - [WO-1, a, b]\n")
            .unwrap();

        assert!(matches!(
            FileStore::new(dir.path()).read("WO_Log"),
            Err(WotrackError::DuplicateColumn { column, .. }) if column == "Status"
        ));
    }

    #[test]
    fn seed_does_not_clobber() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.seed("users", &["name"]).unwrap());
        assert!(!store.seed("users", &["other"]).unwrap());
        assert_eq!(store.read("users").unwrap().columns(), ["name"]);
    }

    #[test]
    fn rejects_path_like_sheet_names() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.read("../config"),
            Err(WotrackError::InvalidSheetName(_))
        ));
    }
}
