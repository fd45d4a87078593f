pub mod active;
pub mod config;
pub mod desk;
pub mod error;
pub mod io;
pub mod paths;
pub mod reconcile;
pub mod record;
pub mod roster;
pub mod session;
pub mod store;

pub use error::{Result, WotrackError};
