//! Configuration management: defaults, JSON file, environment overrides, validation.

pub mod app_config;
pub mod validation;

pub use app_config::AppConfig;
