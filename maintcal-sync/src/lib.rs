pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod helpers;
pub mod integrations;
pub mod jobs;

pub use crate::config::SyncConfig;
pub use database::ScheduleStore;
pub use error::SyncError;
