//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{CommandsConfig, LogOutput, LoggingConfig, QuiverConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &QuiverConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_commands_config(&config.commands)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.max_files == 0 {
        return Err(ConfigError::validation(
            "logging.max_files must be greater than 0",
        ));
    }

    for target in logging.filters.keys() {
        if target.is_empty() || target.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: {target:?}"
            )));
        }
    }

    Ok(())
}

/// Checks that `prefix` can mark a line as a command.
pub fn validate_prefix(prefix: &str) -> ConfigResult<()> {
    if prefix.is_empty() {
        return Err(ConfigError::invalid_prefix(prefix, "prefix is empty"));
    }
    if prefix.contains(char::is_whitespace) {
        return Err(ConfigError::invalid_prefix(
            prefix,
            "prefix contains whitespace",
        ));
    }
    Ok(())
}

/// Validates the prefix and command overrides.
fn validate_commands_config(commands: &CommandsConfig) -> ConfigResult<()> {
    validate_prefix(&commands.prefix)?;

    for (command, over) in &commands.overrides {
        if command.is_empty() {
            return Err(ConfigError::missing_field("commands.overrides.<id>"));
        }
        if let Some(alias) = over
            .aliases
            .iter()
            .find(|alias| alias.is_empty() || alias.contains(char::is_whitespace))
        {
            return Err(ConfigError::InvalidAlias {
                command: command.clone(),
                alias: alias.clone(),
            });
        }
    }

    Ok(())
}
