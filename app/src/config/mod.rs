//! Configuration: generation defaults, validation, server settings from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;
