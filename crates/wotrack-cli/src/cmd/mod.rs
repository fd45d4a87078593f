pub mod active;
pub mod config;
pub mod init;
pub mod roster;
pub mod serve;
pub mod show;
pub mod update;
