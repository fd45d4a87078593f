pub mod config;
pub mod roster;
pub mod sessions;
pub mod work_orders;
