//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quiver_framework::{ConfigDefaults, DEFAULT_PREFIX, PartialCommandConfig};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuiverConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Command recognition and per-command overrides.
    #[serde(default)]
    pub commands: CommandsConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Written to [`LoggingConfig::file_path`].
    File,
}

/// How often the log file is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

impl SpanEventConfig {
    pub const NONE: Self = Self {
        new: false,
        enter: false,
        exit: false,
        close: false,
    };

    /// Creation and close only.
    pub const LIFECYCLE: Self = Self {
        new: true,
        close: true,
        ..Self::NONE
    };

    /// Enter and exit only.
    pub const ACTIVE: Self = Self {
        enter: true,
        exit: true,
        ..Self::NONE
    };

    pub const FULL: Self = Self {
        new: true,
        enter: true,
        exit: true,
        close: true,
    };
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub span_events: SpanEventConfig,

    /// Include thread ids in each line.
    pub thread_ids: bool,

    /// Include source file and line in each line.
    pub file_location: bool,

    /// Log file for [`LogOutput::File`].
    pub file_path: Option<PathBuf>,
    pub rotation: LogRotation,
    /// Rotated files kept on disk.
    pub max_files: u32,

    /// Per-target levels, e.g. `quiver_framework = "debug"`.
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            rotation: LogRotation::Never,
            max_files: 5,
            filters: HashMap::new(),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Command recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Prefix that marks an input line as a command.
    pub prefix: String,

    /// Per-command settings keyed by command identifier.
    pub overrides: HashMap<String, CommandOverride>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl CommandsConfig {
    /// Builds a defaulting function that applies [`overrides`](Self::overrides)
    /// to every command registered with a matching identifier.
    pub fn defaults(&self) -> ConfigDefaults {
        let overrides = self.overrides.clone();
        std::sync::Arc::new(move |partial: PartialCommandConfig| {
            let over = partial.id.as_ref().and_then(|id| overrides.get(id));
            match over {
                Some(over) => over.apply(partial),
                None => partial,
            }
        })
    }
}

/// Settings for one command, merged in at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOverride {
    /// Added to the aliases the command declares.
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    pub permission: Option<String>,
}

impl CommandOverride {
    /// Adds the configured aliases and fills fields the command left unset.
    pub fn apply(&self, mut partial: PartialCommandConfig) -> PartialCommandConfig {
        for alias in &self.aliases {
            if !partial.aliases.contains(alias) {
                partial.aliases.push(alias.clone());
            }
        }
        if partial.description.is_none() {
            partial.description.clone_from(&self.description);
        }
        if partial.usage.is_none() {
            partial.usage.clone_from(&self.usage);
        }
        if partial.permission.is_none() {
            partial.permission.clone_from(&self.permission);
        }
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_merges_aliases_and_fills_unset() {
        let over = CommandOverride {
            aliases: vec!["dmg".into(), "d".into()],
            description: Some("from config".into()),
            usage: None,
            permission: Some("game.hurt".into()),
        };
        let partial = PartialCommandConfig::from("hurt")
            .alias("dmg")
            .description("from code");

        let merged = over.apply(partial);
        assert_eq!(merged.aliases, vec!["dmg", "d"]);
        assert_eq!(merged.description.as_deref(), Some("from code"));
        assert_eq!(merged.permission.as_deref(), Some("game.hurt"));
        assert_eq!(merged.usage, None);
    }

    #[test]
    fn test_defaults_only_touch_configured_commands() {
        let mut commands = CommandsConfig::default();
        commands.overrides.insert(
            "roll".into(),
            CommandOverride {
                aliases: vec!["r".into()],
                ..Default::default()
            },
        );
        let defaults = commands.defaults();

        assert_eq!(defaults(PartialCommandConfig::from("roll")).aliases, vec!["r"]);
        assert!(defaults(PartialCommandConfig::from("hurt")).aliases.is_empty());
        assert!(defaults(PartialCommandConfig::default()).aliases.is_empty());
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::default().as_str(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
