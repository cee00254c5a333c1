//! Line-driven command runtime.
//!
//! [`CommandRuntime`] wires a [`Tokenizer`] and a [`CommandRegistry`]
//! together from a [`QuiverConfig`]:
//!
//! - the tokenizer uses `commands.prefix`;
//! - registrations pass through `commands.overrides` before completion.
//!
//! Input lines are fed in one at a time with
//! [`handle_line`](CommandRuntime::handle_line), or read from any async
//! reader with [`run`](CommandRuntime::run).
//!
//! ```rust,ignore
//! use quiver_runtime::CommandRuntime;
//!
//! let runtime = CommandRuntime::<Player>::builder()
//!     .config_file("quiver.toml")
//!     .build()?;
//!
//! runtime.register(CommandConfig::new("hurt"), Executor::function(hurt))?;
//! runtime.run(BufReader::new(tokio::io::stdin()), console_player).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::signal;
use tracing::{debug, error, info};

use quiver_framework::{
    CommandConfig, CommandRegistry, DispatchOutcome, Executor, Invocation, PartialCommandConfig,
    PermissionPolicy, RegistryResult, Tokenizer,
};

use crate::config::{ConfigLoader, ConfigResult, QuiverConfig, validate_config, validate_prefix};
use crate::error::RuntimeResult;
use crate::logging;

/// Tokenizes input lines and dispatches them to registered commands.
///
/// Clones share the same registry, prefix and statistics.
pub struct CommandRuntime<S> {
    config: QuiverConfig,
    tokenizer: Arc<RwLock<Tokenizer>>,
    registry: CommandRegistry<S>,
    stats: Arc<Counters>,
}

impl<S> Clone for CommandRuntime<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            tokenizer: Arc::clone(&self.tokenizer),
            registry: self.registry.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> CommandRuntime<S> {
    /// Creates a runtime from the configuration in the current directory.
    ///
    /// Falls back to defaults if the configuration cannot be loaded.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                QuiverConfig::default()
            });

        logging::init_from_config(&config.logging);
        Self::from_config(&config)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from already loaded configuration.
    ///
    /// Does not install logging; see [`init_logging`](Self::init_logging).
    pub fn from_config(config: &QuiverConfig) -> Self {
        let registry = CommandRegistry::new().with_shared_defaults(config.commands.defaults());

        info!(
            prefix = %config.commands.prefix,
            overrides = config.commands.overrides.len(),
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            tokenizer: Arc::new(RwLock::new(Tokenizer::new(config.commands.prefix.clone()))),
            registry,
            stats: Arc::new(Counters::default()),
        }
    }

    /// Replaces the registry's permission policy.
    pub fn with_permission_policy<P: PermissionPolicy<S>>(mut self, policy: P) -> Self {
        self.registry = self.registry.with_permission_policy(policy);
        self
    }

    /// Installs logging from the `logging` section of the configuration.
    pub fn init_logging(&self) {
        logging::init_from_config(&self.config.logging);
    }

    pub fn config(&self) -> &QuiverConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry<S> {
        &self.registry
    }

    /// Registers a command, applying any configured override for its id.
    pub fn register(
        &self,
        config: impl Into<PartialCommandConfig>,
        executor: Executor<S>,
    ) -> RegistryResult<CommandConfig> {
        self.registry.register(config, executor)
    }

    pub fn prefix(&self) -> String {
        self.tokenizer.read().prefix().to_string()
    }

    /// Changes the command prefix. It must be non-empty and contain no
    /// whitespace, as in configuration.
    pub fn set_prefix(&self, prefix: impl Into<String>) -> ConfigResult<()> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        info!(prefix = %prefix, "Command prefix changed");
        self.tokenizer.write().set_prefix(prefix);
        Ok(())
    }

    pub fn tokenize(&self, line: &str) -> Option<Invocation> {
        self.tokenizer.read().tokenize(line)
    }

    /// Tokenizes `line` and dispatches it.
    ///
    /// Returns `None` when the line is not a command.
    pub fn handle_line(&self, sender: S, line: &str) -> Option<DispatchOutcome> {
        self.stats.lines.fetch_add(1, Ordering::Relaxed);

        let Some(invocation) = self.tokenize(line) else {
            self.stats.ignored.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        let outcome = self
            .registry
            .execute_name(sender, &invocation.name, invocation.tokens);

        let counter = match outcome {
            DispatchOutcome::Executed => &self.stats.executed,
            DispatchOutcome::NotFound => &self.stats.not_found,
            DispatchOutcome::NoPermission => &self.stats.no_permission,
            DispatchOutcome::NoRuntime => &self.stats.no_runtime,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        debug!(command = %invocation.name, outcome = %outcome, "Handled input line");
        Some(outcome)
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            lines: self.stats.lines.load(Ordering::Relaxed),
            ignored: self.stats.ignored.load(Ordering::Relaxed),
            executed: self.stats.executed.load(Ordering::Relaxed),
            not_found: self.stats.not_found.load(Ordering::Relaxed),
            no_permission: self.stats.no_permission.load(Ordering::Relaxed),
            no_runtime: self.stats.no_runtime.load(Ordering::Relaxed),
            commands: self.registry.len(),
        }
    }

    /// Handles every line from `reader` as sent by `sender`, until the
    /// reader is exhausted or Ctrl+C is received.
    pub async fn run<R>(&self, reader: R, sender: S) -> RuntimeResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(
            prefix = %self.prefix(),
            "Quiver runtime is now reading commands. Press Ctrl+C to stop."
        );
        self.run_until(reader, sender, wait_for_shutdown()).await
    }

    /// Like [`run`](Self::run), stopping when `shutdown` completes.
    pub async fn run_until<R, F>(&self, reader: R, sender: S, shutdown: F) -> RuntimeResult<()>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping runtime");
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) => {
                        self.handle_line(sender.clone(), &line);
                    }
                    None => {
                        debug!("Input closed, stopping runtime");
                        break;
                    }
                },
            }
        }

        info!(stats = %self.stats(), "Runtime stopped");
        Ok(())
    }
}

impl<S: Clone + Send + Sync + 'static> Default for CommandRuntime<S> {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    lines: AtomicU64,
    ignored: AtomicU64,
    executed: AtomicU64,
    not_found: AtomicU64,
    no_permission: AtomicU64,
    no_runtime: AtomicU64,
}

/// Statistics about handled input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Lines passed to the runtime.
    pub lines: u64,
    /// Lines that were not commands.
    pub ignored: u64,
    pub executed: u64,
    pub not_found: u64,
    pub no_permission: u64,
    /// Lines dispatched outside a Tokio runtime.
    pub no_runtime: u64,
    /// Distinct registered commands.
    pub commands: usize,
}

impl fmt::Display for RuntimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines ({} ignored), {} executed, {} not found, {} denied, {} commands",
            self.lines,
            self.ignored,
            self.executed,
            self.not_found,
            self.no_permission,
            self.commands
        )?;
        if self.no_runtime > 0 {
            write!(f, ", {} outside runtime", self.no_runtime)?;
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Loads and validates configuration, installs logging, and builds a
/// [`CommandRuntime`].
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    init_logging: bool,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            init_logging: true,
        }
    }

    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    pub fn merge(mut self, config: QuiverConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Leaves logging to the host application.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    pub fn build<S: Clone + Send + Sync + 'static>(self) -> RuntimeResult<CommandRuntime<S>> {
        let config = self.config_loader.load()?;
        validate_config(&config)?;

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }
        Ok(CommandRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
