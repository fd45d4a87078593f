use thiserror::Error;

#[derive(Debug, Error)]
pub enum WotrackError {
    #[error("not initialized: run 'wotrack init'")]
    NotInitialized,

    #[error("work order not found: {0}")]
    WorkOrderNotFound(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("invalid sheet name '{0}'")]
    InvalidSheetName(String),

    #[error("missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("duplicate column '{column}' in sheet '{sheet}'")]
    DuplicateColumn { sheet: String, column: String },

    #[error("row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("invalid spreadsheet source: {0}")]
    InvalidSource(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for WotrackError {
    fn from(err: reqwest::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WotrackError>;
