use crate::error::{Result, WotrackError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const WOTRACK_DIR: &str = ".wotrack";
pub const SHEETS_DIR: &str = ".wotrack/sheets";
pub const CONFIG_FILE: &str = ".wotrack/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn wotrack_dir(root: &Path) -> PathBuf {
    root.join(WOTRACK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn sheets_dir(root: &Path) -> PathBuf {
    root.join(SHEETS_DIR)
}

pub fn sheet_path(root: &Path, sheet: &str) -> PathBuf {
    sheets_dir(root).join(format!("{sheet}.yaml"))
}

// ---------------------------------------------------------------------------
// Sheet name validation
// ---------------------------------------------------------------------------

static SHEET_RE: OnceLock<Regex> = OnceLock::new();

fn sheet_re() -> &'static Regex {
    SHEET_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _\-]*$").unwrap())
}

/// Sheet names double as file stems for the local workbook, so anything that
/// could escape the sheets directory is rejected.
pub fn validate_sheet_name(sheet: &str) -> Result<()> {
    if sheet.is_empty() || sheet.len() > 100 || !sheet_re().is_match(sheet) {
        return Err(WotrackError::InvalidSheetName(sheet.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Spreadsheet source identifiers
// ---------------------------------------------------------------------------

static SPREADSHEET_URL_RE: OnceLock<Regex> = OnceLock::new();
static SPREADSHEET_ID_RE: OnceLock<Regex> = OnceLock::new();

fn spreadsheet_url_re() -> &'static Regex {
    SPREADSHEET_URL_RE.get_or_init(|| {
        Regex::new(r"^https://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_\-]+)(?:[/?#].*)?$")
            .unwrap()
    })
}

fn spreadsheet_id_re() -> &'static Regex {
    SPREADSHEET_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]{10,}$").unwrap())
}

/// Extract the spreadsheet id from a share URL, or accept a bare id.
pub fn spreadsheet_id(source: &str) -> Result<String> {
    let source = source.trim();
    if let Some(caps) = spreadsheet_url_re().captures(source) {
        return Ok(caps[1].to_string());
    }
    if spreadsheet_id_re().is_match(source) {
        return Ok(source.to_string());
    }
    Err(WotrackError::InvalidSource(source.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
