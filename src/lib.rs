//! actionbook CLI library
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;
pub mod report;

pub use config::{load_config, AppConfig, ConfigSource};
pub use report::FsReporter;
