use crate::error::{Result, WotrackError};
use crate::paths;
use crate::record::DEFAULT_KEY_COLUMN;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

pub const DEFAULT_TOKEN_ENV: &str = "WOTRACK_SHEETS_TOKEN";
pub const DEFAULT_SHEETS_API: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// YAML sheets under `.wotrack/sheets/`.
    File,
    GoogleSheets {
        spreadsheet_url: String,
        /// Environment variable holding an OAuth bearer token.
        #[serde(default = "default_token_env")]
        token_env: String,
        #[serde(default = "default_api_base_url")]
        api_base_url: String,
    },
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_SHEETS_API.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::File
    }
}

impl StoreConfig {
    pub fn google_sheets(spreadsheet_url: impl Into<String>) -> Self {
        Self::GoogleSheets {
            spreadsheet_url: spreadsheet_url.into(),
            token_env: default_token_env(),
            api_base_url: default_api_base_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// SheetNames / FieldNames
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetNames {
    #[serde(default = "default_work_orders_sheet")]
    pub work_orders: String,
    #[serde(default = "default_roster_sheet")]
    pub roster: String,
}

fn default_work_orders_sheet() -> String {
    "WO_Log".to_string()
}

fn default_roster_sheet() -> String {
    "users".to_string()
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            work_orders: default_work_orders_sheet(),
            roster: default_roster_sheet(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_key_field")]
    pub key: String,
    #[serde(default = "default_status_field")]
    pub status: String,
    #[serde(default = "default_assignee_field")]
    pub assignee: String,
    /// Read-only columns shown alongside a work order.
    #[serde(default = "default_display_fields")]
    pub display: Vec<String>,
}

fn default_key_field() -> String {
    DEFAULT_KEY_COLUMN.to_string()
}

fn default_status_field() -> String {
    "Status".to_string()
}

fn default_assignee_field() -> String {
    "Assigned To".to_string()
}

fn default_display_fields() -> Vec<String> {
    vec![
        "Date".to_string(),
        "Client_Name_Display".to_string(),
        "Category".to_string(),
    ]
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            key: default_key_field(),
            status: default_status_field(),
            assignee: default_assignee_field(),
            display: default_display_fields(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sheets: SheetNames,
    #[serde(default)]
    pub fields: FieldNames,
    #[serde(default = "default_status_options")]
    pub status_options: Vec<String>,
    #[serde(default = "default_roster_fallback")]
    pub roster_fallback: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn default_status_options() -> Vec<String> {
    ["Pending", "In progress", "Completed", "On Hold", "Cancelled"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_roster_fallback() -> Vec<String> {
    vec!["Admin".to_string(), "Unassigned".to_string()]
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
            },
            store: StoreConfig::File,
            sheets: SheetNames::default(),
            fields: FieldNames::default(),
            status_options: default_status_options(),
            roster_fallback: default_roster_fallback(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(WotrackError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.status_options.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "status_options is empty; the status selector has nothing to offer"
                    .to_string(),
            });
        }

        let mut seen = HashSet::new();
        for status in &self.status_options {
            if !seen.insert(status.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("duplicate status option '{status}'"),
                });
            }
        }

        if self.roster_fallback.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "roster_fallback is empty; assignment has no default when the roster is unreadable"
                    .to_string(),
            });
        }

        for (label, sheet) in [
            ("sheets.work_orders", &self.sheets.work_orders),
            ("sheets.roster", &self.sheets.roster),
        ] {
            if paths::validate_sheet_name(sheet).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{label} '{sheet}' is not a valid sheet name"),
                });
            }
        }

        if let StoreConfig::GoogleSheets {
            spreadsheet_url, ..
        } = &self.store
        {
            if paths::spreadsheet_id(spreadsheet_url).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "store.spreadsheet_url '{spreadsheet_url}' is not a Google Sheets URL or id"
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
