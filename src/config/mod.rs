//! Configuration module for the morning greeting widget.
//!
//! Provides [`GreetingConfig`] (the persisted settings record), the
//! [`Language`] selector, [`AppPaths`] for cross-platform directories, and
//! TOML persistence via `GreetingConfig::load` / `GreetingConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ConfigError, GreetingConfig, Language, DEFAULT_ENDPOINT, DEFAULT_MODEL};
