//! Service configuration.
//!
//! Configuration is loaded from a TOML file with `OSCAR_`-prefixed
//! environment variable overrides. The `roster` and `chat` sections are
//! optional as wholes: when absent, the features depending on them are
//! disabled at startup with a logged warning instead of failing.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::{
    AuthConfig, AuthMethod, CampusConfig, ChatConfig, Config, RosterConfig, SanitizedConfig,
    SchedulerConfig, ServerConfig,
};
pub use validate::validate_config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
