//! Configuration for Quiver applications.
//!
//! Settings are layered with figment from defaults, TOML/YAML files and
//! `QUIVER_*` environment variables. See [`ConfigLoader`] for the order.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, PROFILE_ENV, Profile, load_config, load_config_from_file};
pub use schema::{
    CommandOverride, CommandsConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    QuiverConfig, SpanEventConfig,
};
pub use validation::{validate_config, validate_prefix};
