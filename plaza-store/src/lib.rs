pub mod app_config;
pub mod file_catalog;
pub mod telemetry;

pub use file_catalog::FileCatalog;
