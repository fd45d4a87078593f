//! Spreadsheet-backed record storage.
//!
//! A store reads a whole sheet into a [`RecordSet`] and writes one back,
//! replacing everything previously at that sheet. There is no partial update
//! and no version check: the last writer wins.

mod file;
mod sheets;

pub use file::FileStore;
pub use sheets::SheetsStore;

use crate::config::{Config, StoreConfig};
use crate::error::{Result, WotrackError};
use crate::record::RecordSet;
use std::path::Path;

pub trait RecordStore: Send + Sync {
    fn read(&self, sheet: &str) -> Result<RecordSet>;

    fn write(&self, sheet: &str, records: &RecordSet) -> Result<()>;
}

/// Open the store named by `config.store`.
pub fn open_store(root: &Path, config: &Config) -> Result<Box<dyn RecordStore>> {
    match &config.store {
        StoreConfig::File => Ok(Box::new(FileStore::new(root))),
        StoreConfig::GoogleSheets {
            spreadsheet_url,
            token_env,
            api_base_url,
        } => {
            let token = std::env::var(token_env).map_err(|_| {
                WotrackError::StoreUnavailable(format!("access token not set: export {token_env}"))
            })?;
            let store = SheetsStore::new(spreadsheet_url, token, api_base_url)?;
            Ok(Box::new(store))
        }
    }
}
