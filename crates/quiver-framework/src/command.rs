//! Command configuration.
//!
//! A command is registered from a [`PartialCommandConfig`]. The registry may
//! run a defaulting function over it to fill fields (typically from a config
//! file) before it is completed into a [`CommandConfig`]:
//!
//! ```rust
//! use quiver_framework::{CommandConfig, PartialCommandConfig};
//!
//! let partial = PartialCommandConfig::from("hurt").alias("dmg");
//! let config = partial.complete().unwrap();
//! assert_eq!(config, CommandConfig::new("hurt").alias("dmg"));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RegistryError, RegistryResult};

/// The complete configuration of a registered command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Primary identifier, matched exactly.
    pub id: String,

    /// Alternative names resolving to the same command.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Short description for help listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Usage line, e.g. `<target> <amount>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Permission node checked by permission policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// Any additional fields, kept verbatim.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl CommandConfig {
    /// Creates a configuration with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aliases: Vec::new(),
            description: None,
            usage: None,
            permission: None,
            extra: Map::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// The identifier followed by every alias.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn validate(&self) -> RegistryResult<()> {
        for label in self.labels() {
            if label.is_empty() {
                return Err(RegistryError::invalid_label(label, "label is empty"));
            }
            if label.chars().any(char::is_whitespace) {
                return Err(RegistryError::invalid_label(
                    label,
                    "label contains whitespace",
                ));
            }
        }
        Ok(())
    }
}

/// A command configuration whose fields may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialCommandConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl PartialCommandConfig {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Completes the configuration, failing if the identifier is missing or
    /// any label is unusable.
    pub fn complete(self) -> RegistryResult<CommandConfig> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or(RegistryError::missing_field("id"))?;

        let config = CommandConfig {
            id,
            aliases: self.aliases,
            description: self.description,
            usage: self.usage,
            permission: self.permission,
            extra: self.extra,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<CommandConfig> for PartialCommandConfig {
    fn from(config: CommandConfig) -> Self {
        Self {
            id: Some(config.id),
            aliases: config.aliases,
            description: config.description,
            usage: config.usage,
            permission: config.permission,
            extra: config.extra,
        }
    }
}

impl From<&str> for PartialCommandConfig {
    fn from(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }
}

impl From<String> for PartialCommandConfig {
    fn from(id: String) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

/// Fills missing fields of a partial configuration at registration time.
pub type ConfigDefaults = Arc<dyn Fn(PartialCommandConfig) -> PartialCommandConfig + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_start_with_id() {
        let config = CommandConfig::new("hurt").alias("dmg").alias("damage");
        assert_eq!(config.labels().collect::<Vec<_>>(), ["hurt", "dmg", "damage"]);
    }

    #[test]
    fn test_complete_requires_id() {
        let partial = PartialCommandConfig::default().alias("x");
        assert_eq!(partial.complete(), Err(RegistryError::missing_field("id")));

        let partial = PartialCommandConfig::from("");
        assert_eq!(partial.complete(), Err(RegistryError::missing_field("id")));
    }

    #[test]
    fn test_complete_rejects_whitespace_labels() {
        let partial = PartialCommandConfig::from("hurt").alias("deal damage");
        assert!(matches!(
            partial.complete(),
            Err(RegistryError::InvalidLabel { label, .. }) if label == "deal damage"
        ));
    }

    #[test]
    fn test_round_trip_through_partial() {
        let config = CommandConfig::new("give")
            .description("Give an item")
            .usage("<player> <item> [count]")
            .permission("admin.give");
        let partial = PartialCommandConfig::from(config.clone());
        assert_eq!(partial.complete().unwrap(), config);
    }

    #[test]
    fn test_deserialize_keeps_extra_fields() {
        let config: CommandConfig = serde_json::from_value(serde_json::json!({
            "id": "roll",
            "aliases": ["r"],
            "cooldown": 5
        }))
        .unwrap();
        assert_eq!(config.aliases, vec!["r"]);
        assert_eq!(config.extra.get("cooldown"), Some(&Value::from(5)));
    }
}
