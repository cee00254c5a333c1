//! Layered configuration loading.
//!
//! [`ConfigLoader`] stacks these sources into one figment, lowest priority
//! first:
//!
//! | Layer | Source                                                              |
//! |-------|---------------------------------------------------------------------|
//! | 1     | [`QuiverConfig::default`]                                           |
//! | 2     | values passed to [`ConfigLoader::merge`]                            |
//! | 3     | `quiver.{profile}.{ext}` beside the main file                       |
//! | 4     | the main file `quiver.{ext}` / `config.{ext}`, or [`ConfigLoader::file`] |
//! | 5     | `QUIVER_*` environment variables, `__` separating nested keys       |
//!
//! So `QUIVER_COMMANDS__PREFIX=!` sets `commands.prefix`, whatever the files
//! say.
//!
//! File formats follow cargo features: `toml-config` reads `.toml`,
//! `yaml-config` reads `.yaml` and `.yml`. The first directory holding a main
//! file in any enabled format wins; other directories are not consulted.
//!
//! ```rust,ignore
//! use quiver_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("prod")
//!     .search_path("/etc/quiver")
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::QuiverConfig;

/// Environment variable selecting the configuration profile.
pub const PROFILE_ENV: &str = "QUIVER_PROFILE";

const ENV_PREFIX: &str = "QUIVER_";

/// Main file names, without extension, in search order.
const FILE_STEMS: [&str; 2] = ["quiver", "config"];

// =============================================================================
// Profile
// =============================================================================

/// The name of an environment-specific overlay such as
/// `quiver.production.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile(String);

impl Profile {
    pub const DEVELOPMENT: &'static str = "development";
    pub const PRODUCTION: &'static str = "production";

    /// Lowercases `name` and expands the `dev` and `prod` shorthands. A blank
    /// name selects the default profile.
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "" => Self::default(),
            "dev" => Self(Self::DEVELOPMENT.to_string()),
            "prod" => Self(Self::PRODUCTION.to_string()),
            _ => Self(name),
        }
    }

    /// Reads [`PROFILE_ENV`], defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|name| Self::new(&name))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_production(&self) -> bool {
        self.0 == Self::PRODUCTION
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self(Self::DEVELOPMENT.to_string())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// File formats
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    /// Formats compiled in, in search order.
    #[allow(unused_mut)]
    fn enabled() -> Vec<Self> {
        let mut formats = Vec::new();
        #[cfg(feature = "toml-config")]
        formats.push(Self::Toml);
        #[cfg(feature = "yaml-config")]
        formats.push(Self::Yaml);
        formats
    }

    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::enabled()
            .into_iter()
            .find(|format| format.extensions().contains(&ext))
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    #[allow(unused_variables)]
    fn provide(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(Yaml::file(path)),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Builds a [`QuiverConfig`] from defaults, files and the environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    profile: Profile,
    directories: Vec<PathBuf>,
    /// Loaded instead of searching [`directories`](Self::search_path).
    file: Option<PathBuf>,
    merged: Figment,
    env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader for the profile in [`PROFILE_ENV`], reading the environment.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            directories: Vec::new(),
            file: None,
            merged: Figment::new(),
            env: true,
        }
    }

    pub fn profile(mut self, name: impl AsRef<str>) -> Self {
        self.profile = Profile::new(name.as_ref());
        self
    }

    /// Adds a directory to search, after those added before.
    ///
    /// With no directory added, the current directory and then the user
    /// config directory (`~/.config/quiver` on Linux) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.directories.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("quiver")),
            None => self,
        }
    }

    /// Reads exactly `path`. Its profile overlay is not looked for.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Layers `config` just above the built-in defaults.
    pub fn merge(mut self, config: QuiverConfig) -> Self {
        self.merged = self.merged.merge(Serialized::defaults(config));
        self
    }

    pub fn load(&self) -> ConfigResult<QuiverConfig> {
        let config: QuiverConfig = self.figment()?.extract()?;
        debug!(
            profile = %self.profile,
            level = %config.logging.level,
            prefix = %config.commands.prefix,
            overrides = config.commands.overrides.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// The layered sources, before extraction.
    pub fn figment(&self) -> ConfigResult<Figment> {
        let mut figment =
            Figment::from(Serialized::defaults(QuiverConfig::default())).merge(self.merged.clone());

        let files = self.files()?;
        if files.is_empty() {
            debug!(profile = %self.profile, "No configuration file found, using defaults");
        }
        for (format, path) in files {
            info!(path = %path.display(), "Loading configuration file");
            figment = format.provide(figment, &path);
        }

        if self.env {
            trace!(prefix = ENV_PREFIX, "Reading configuration from environment");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        Ok(figment)
    }

    /// Files to merge, lowest priority first.
    fn files(&self) -> ConfigResult<Vec<(FileFormat, PathBuf)>> {
        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            let format =
                FileFormat::of(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.clone()))?;
            return Ok(vec![(format, path.clone())]);
        }

        for directory in self.directories() {
            for format in FileFormat::enabled() {
                for stem in FILE_STEMS {
                    for ext in format.extensions() {
                        let main = directory.join(format!("{stem}.{ext}"));
                        if !main.is_file() {
                            continue;
                        }

                        let mut files = Vec::with_capacity(2);
                        let overlay = directory.join(format!("{stem}.{}.{ext}", self.profile));
                        if overlay.is_file() {
                            files.push((format, overlay));
                        }
                        files.push((format, main));
                        return Ok(files);
                    }
                }
            }
        }
        Ok(Vec::new())
    }

    fn directories(&self) -> Vec<PathBuf> {
        if !self.directories.is_empty() {
            return self.directories.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("quiver")))
            .collect()
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<QuiverConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from one file plus environment variables.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<QuiverConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .without_env()
                .search_path(jail.directory())
                .load()
                .unwrap();
            assert_eq!(config.logging.level, LogLevel::Info);
            assert_eq!(config.commands.prefix, "/");
            Ok(())
        });
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(Profile::new("PROD").name(), Profile::PRODUCTION);
        assert_eq!(Profile::new(" dev ").name(), Profile::DEVELOPMENT);
        assert_eq!(Profile::new("Staging").name(), "staging");
        assert_eq!(Profile::new(""), Profile::default());
        assert!(Profile::new("production").is_production());
    }

    #[test]
    fn test_profile_from_env() {
        Jail::expect_with(|jail| {
            assert_eq!(Profile::from_env(), Profile::default());
            jail.set_env(PROFILE_ENV, "prod");
            assert!(Profile::from_env().is_production());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("QUIVER_COMMANDS__PREFIX", "!");
            jail.set_env("QUIVER_LOGGING__LEVEL", "debug");
            let loader = ConfigLoader::new().search_path(jail.directory());

            let config = loader.load().unwrap();
            assert_eq!(config.commands.prefix, "!");
            assert_eq!(config.logging.level, LogLevel::Debug);

            let config = loader.without_env().load().unwrap();
            assert_eq!(config.commands.prefix, "/");
            Ok(())
        });
    }

    #[test]
    fn test_merge_above_defaults() {
        Jail::expect_with(|jail| {
            let mut overrides = QuiverConfig::default();
            overrides.commands.prefix = "::".into();

            let config = ConfigLoader::new()
                .without_env()
                .search_path(jail.directory())
                .merge(overrides)
                .load()
                .unwrap();
            assert_eq!(config.commands.prefix, "::");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_env_value_fails_extraction() {
        Jail::expect_with(|jail| {
            jail.set_env("QUIVER_LOGGING__LEVEL", "loud");
            let result = ConfigLoader::new().search_path(jail.directory()).load();
            assert!(matches!(result, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_errors() {
        Jail::expect_with(|jail| {
            let result = ConfigLoader::new().file("absent.toml").load();
            assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

            jail.create_file("quiver.ini", "prefix = !")?;
            let result = ConfigLoader::new().file("quiver.ini").load();
            assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "quiver.development.toml",
                r#"
                [logging]
                level = "trace"

                [commands]
                prefix = "?"
                "#,
            )?;
            jail.create_file(
                "quiver.toml",
                r#"
                [commands]
                prefix = "!"

                [commands.overrides.hurt]
                aliases = ["dmg"]
                permission = "game.hurt"
                "#,
            )?;
            jail.set_env("QUIVER_LOGGING__LEVEL", "warn");

            let loader = ConfigLoader::new()
                .profile("dev")
                .search_path(jail.directory());

            let config = loader.load().unwrap();
            assert_eq!(config.commands.prefix, "!");
            assert_eq!(config.logging.level, LogLevel::Warn);
            let hurt = &config.commands.overrides["hurt"];
            assert_eq!(hurt.aliases, vec!["dmg"]);
            assert_eq!(hurt.permission.as_deref(), Some("game.hurt"));

            let config = loader.without_env().load().unwrap();
            assert_eq!(config.logging.level, LogLevel::Trace);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_first_directory_wins() {
        Jail::expect_with(|jail| {
            std::fs::create_dir(jail.directory().join("a")).unwrap();
            std::fs::create_dir(jail.directory().join("b")).unwrap();
            jail.create_file("b/config.toml", "[commands]\nprefix = \"b\"")?;
            jail.create_file("a/quiver.toml", "[commands]\nprefix = \"a\"")?;

            let config = ConfigLoader::new()
                .without_env()
                .search_path(jail.directory().join("a"))
                .search_path(jail.directory().join("b"))
                .load()
                .unwrap();
            assert_eq!(config.commands.prefix, "a");
            Ok(())
        });
    }
}
