//! Command registry and dispatcher.
//!
//! The [`CommandRegistry`] maps every command identifier and alias to one
//! registered command and dispatches invocations to it:
//!
//! 1. Look the name up among identifiers and aliases. A miss yields
//!    [`DispatchOutcome::NotFound`].
//! 2. Ask the [`PermissionPolicy`]. A refusal yields
//!    [`DispatchOutcome::NoPermission`].
//! 3. Build fresh [`Arguments`] from the tokens, spawn the executor on the
//!    Tokio runtime and return [`DispatchOutcome::Executed`] immediately.
//!
//! The outcome of the handler itself is reported later to the completion
//! hook. Handler errors and panics are caught in the spawned task and
//! reported as unsuccessful completions; they never reach the dispatching
//! caller.
//!
//! ```rust,ignore
//! let registry = CommandRegistry::<User>::new();
//! registry.register(
//!     CommandConfig::new("hurt").alias("dmg"),
//!     Executor::function(hurt),
//! )?;
//!
//! assert_eq!(registry.execute_name(user, "dmg", ["zombie", "4"]), DispatchOutcome::Executed);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Instrument, Level, debug, error, info, span};

use quiver_core::Arguments;

use crate::command::{CommandConfig, ConfigDefaults, PartialCommandConfig};
use crate::error::RegistryResult;
use crate::executor::Executor;
use crate::permission::{AllowAll, PermissionPolicy};

/// The immediate result of dispatching an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// The handler was spawned.
    Executed,
    /// No command is registered under the name.
    NotFound,
    /// The permission policy refused the sender.
    NoPermission,
    /// Dispatch was attempted outside a Tokio runtime. The handler did not run.
    NoRuntime,
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Executed => "executed",
            Self::NotFound => "not found",
            Self::NoPermission => "no permission",
            Self::NoRuntime => "no runtime",
        })
    }
}

/// Reported to the completion hook once a handler has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Identifier of the command that ran.
    pub command: String,
    /// The name or alias it was invoked by.
    pub label: String,
    /// `false` if the handler declined, returned an error or panicked.
    pub success: bool,
}

/// Called with the sender and outcome of every finished handler.
pub type CompletionHook<S> = Arc<dyn Fn(&S, &Completion) + Send + Sync>;

/// A dispatch outcome together with the spawned handler task, if any.
#[derive(Debug)]
pub struct Dispatch {
    pub outcome: DispatchOutcome,
    /// Resolves to the handler's [`Completion`]. `None` unless executed.
    pub task: Option<JoinHandle<Completion>>,
}

impl Dispatch {
    fn rejected(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            task: None,
        }
    }
}

struct RegisteredCommand<S> {
    config: CommandConfig,
    executor: Executor<S>,
}

/// Maps command names and aliases to executors and dispatches invocations.
///
/// # Cheap Cloning
///
/// Clones share the same command map and completion hook, so a registry can
/// be handed to every task that dispatches commands.
pub struct CommandRegistry<S> {
    /// Every identifier and alias, each pointing at its command.
    commands: Arc<RwLock<HashMap<String, Arc<RegisteredCommand<S>>>>>,
    policy: Arc<dyn PermissionPolicy<S>>,
    defaults: Option<ConfigDefaults>,
    hook: Arc<RwLock<Option<CompletionHook<S>>>>,
}

impl<S> Clone for CommandRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            commands: Arc::clone(&self.commands),
            policy: Arc::clone(&self.policy),
            defaults: self.defaults.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Default for CommandRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + 'static> CommandRegistry<S> {
    /// Creates an empty registry that allows every sender.
    pub fn new() -> Self {
        Self {
            commands: Arc::new(RwLock::new(HashMap::new())),
            policy: Arc::new(AllowAll),
            defaults: None,
            hook: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the eligibility check run before every execution.
    pub fn with_permission_policy<P: PermissionPolicy<S>>(mut self, policy: P) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Sets the function that fills partial configurations on registration.
    pub fn with_defaults<F>(mut self, defaults: F) -> Self
    where
        F: Fn(PartialCommandConfig) -> PartialCommandConfig + Send + Sync + 'static,
    {
        self.with_shared_defaults(Arc::new(defaults))
    }

    /// Like [`with_defaults`](Self::with_defaults), reusing an existing
    /// defaulting function.
    pub fn with_shared_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Installs the hook called after every handler run.
    pub fn set_completion_hook<F>(&self, hook: F)
    where
        F: Fn(&S, &Completion) + Send + Sync + 'static,
    {
        *self.hook.write() = Some(Arc::new(hook));
    }

    pub fn clear_completion_hook(&self) {
        *self.hook.write() = None;
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a command under its identifier and every alias.
    ///
    /// Existing entries under the same labels are overwritten. Returns the
    /// completed configuration.
    pub fn register(
        &self,
        config: impl Into<PartialCommandConfig>,
        executor: Executor<S>,
    ) -> RegistryResult<CommandConfig> {
        let mut partial = config.into();
        if let Some(defaults) = &self.defaults {
            partial = defaults(partial);
        }
        let config = partial.complete()?;

        let command = Arc::new(RegisteredCommand {
            config: config.clone(),
            executor,
        });

        let mut commands = self.commands.write();
        for label in config.labels() {
            if let Some(previous) = commands.insert(label.to_string(), Arc::clone(&command)) {
                debug!(
                    label = %label,
                    previous = %previous.config.id,
                    "Overwrote existing command label"
                );
            }
        }

        info!(
            command = %config.id,
            aliases = config.aliases.len(),
            "Registered command"
        );
        Ok(config)
    }

    /// Removes the identifier and every alias listed in `config`.
    ///
    /// Returns the number of labels that were removed.
    pub fn deregister(&self, config: &CommandConfig) -> usize {
        let mut commands = self.commands.write();
        let removed = config
            .labels()
            .filter(|label| commands.remove(*label).is_some())
            .count();

        info!(command = %config.id, removed, "Deregistered command");
        removed
    }

    /// Removes the command registered under the identifier `id`, together
    /// with every alias still pointing at it.
    pub fn deregister_id(&self, id: &str) -> Option<CommandConfig> {
        let mut commands = self.commands.write();
        let command = commands
            .get(id)
            .filter(|command| command.config.id == id)
            .cloned()?;

        commands.retain(|_, entry| !Arc::ptr_eq(entry, &command));

        info!(command = %id, "Deregistered command");
        Some(command.config.clone())
    }

    /// Removes every command.
    pub fn clear(&self) {
        self.commands.write().clear();
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Returns the configuration registered under an identifier or alias.
    pub fn lookup(&self, label: &str) -> Option<CommandConfig> {
        self.commands
            .read()
            .get(label)
            .map(|command| command.config.clone())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.commands.read().contains_key(label)
    }

    /// Returns every distinct registered command, sorted by identifier.
    pub fn commands(&self) -> Vec<CommandConfig> {
        let commands = self.commands.read();
        let mut unique: Vec<&Arc<RegisteredCommand<S>>> = Vec::new();
        for command in commands.values() {
            if !unique.iter().any(|seen| Arc::ptr_eq(seen, command)) {
                unique.push(command);
            }
        }

        let mut configs: Vec<CommandConfig> = unique
            .into_iter()
            .map(|command| command.config.clone())
            .collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        configs
    }

    /// Returns every registered identifier and alias, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.commands.read().keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Number of distinct registered commands.
    pub fn len(&self) -> usize {
        self.commands().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            commands: self.len(),
            labels: self.commands.read().len(),
        }
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Dispatches `tokens` to the command registered under `name`.
    ///
    /// Outside a Tokio runtime the handler is not run and the outcome is
    /// [`DispatchOutcome::NoRuntime`].
    pub fn execute_name<I, T>(&self, sender: S, name: &str, tokens: I) -> DispatchOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.execute_name_tracked(sender, name, tokens).outcome
    }

    /// Like [`execute_name`](Self::execute_name), also returning the spawned
    /// handler task.
    pub fn execute_name_tracked<I, T>(&self, sender: S, name: &str, tokens: I) -> Dispatch
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let command = self.commands.read().get(name).cloned();
        let Some(command) = command else {
            debug!(command = %name, "Command not found");
            return Dispatch::rejected(DispatchOutcome::NotFound);
        };

        self.dispatch(sender, command, name.to_string(), Arguments::new(tokens))
    }

    /// Dispatches `tokens` to the command registered under `config.id`.
    ///
    /// Outside a Tokio runtime the handler is not run and the outcome is
    /// [`DispatchOutcome::NoRuntime`].
    pub fn execute_config<I, T>(
        &self,
        sender: S,
        config: &CommandConfig,
        tokens: I,
    ) -> DispatchOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.execute_config_tracked(sender, config, tokens).outcome
    }

    /// Like [`execute_config`](Self::execute_config), also returning the
    /// spawned handler task.
    pub fn execute_config_tracked<I, T>(
        &self,
        sender: S,
        config: &CommandConfig,
        tokens: I,
    ) -> Dispatch
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let command = self
            .commands
            .read()
            .get(&config.id)
            .filter(|command| command.config.id == config.id)
            .cloned();
        let Some(command) = command else {
            debug!(command = %config.id, "Command not found");
            return Dispatch::rejected(DispatchOutcome::NotFound);
        };

        self.dispatch(sender, command, config.id.clone(), Arguments::new(tokens))
    }

    fn dispatch(
        &self,
        sender: S,
        command: Arc<RegisteredCommand<S>>,
        label: String,
        args: Arguments,
    ) -> Dispatch {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            command = %command.config.id,
            label = %label
        );
        let _enter = span.enter();

        if !self.policy.is_eligible(&sender, &command.config) {
            debug!("Sender is not eligible, skipping command");
            return Dispatch::rejected(DispatchOutcome::NoPermission);
        }

        debug!(tokens = args.len(), "Spawning command handler");

        let Ok(handle) = Handle::try_current() else {
            error!("Command dispatched outside a Tokio runtime, handler not run");
            return Dispatch::rejected(DispatchOutcome::NoRuntime);
        };

        let hook = self.hook.read().clone();
        let handler = run_handler(sender, command, label, args, hook);
        let task = handle.spawn(handler.instrument(span.clone()));

        Dispatch {
            outcome: DispatchOutcome::Executed,
            task: Some(task),
        }
    }
}

async fn run_handler<S>(
    sender: S,
    command: Arc<RegisteredCommand<S>>,
    label: String,
    args: Arguments,
    hook: Option<CompletionHook<S>>,
) -> Completion
where
    S: Clone + Send + Sync + 'static,
{
    let handler_sender = sender.clone();
    let handler_label = label.clone();
    let executor = command.executor.clone();

    let result = AssertUnwindSafe(async move {
        executor.invoke(handler_sender, args, handler_label).await
    })
    .catch_unwind()
    .await;

    let success = match result {
        Ok(Ok(success)) => success,
        Ok(Err(e)) => {
            error!("Command handler error: {e}");
            false
        }
        Err(_) => {
            error!("Command handler panicked");
            false
        }
    };

    let completion = Completion {
        command: command.config.id.clone(),
        label,
        success,
    };
    debug!(success, "Command handler finished");

    if let Some(hook) = hook {
        hook(&sender, &completion);
    }
    completion
}

/// Statistics about the command registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of distinct commands.
    pub commands: usize,
    /// Number of identifiers and aliases.
    pub labels: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} commands ({} labels)", self.commands, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::error::RegistryError;
    use crate::permission::RequirePermission;
    use quiver_core::{Descriptor, parsers};

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        name: &'static str,
        admin: bool,
    }

    const ALICE: User = User {
        name: "alice",
        admin: true,
    };
    const BOB: User = User {
        name: "bob",
        admin: false,
    };

    /// An executor that forwards each invocation's label and tokens.
    fn recording(tx: mpsc::UnboundedSender<(String, Vec<String>)>) -> Executor<User> {
        Executor::function(move |_sender: User, args: Arguments, label: String| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((label, args.into_tokens()));
            }
        })
    }

    fn noop() -> Executor<User> {
        Executor::function(|_: User, _: Arguments, _: String| async {})
    }

    #[tokio::test]
    async fn test_alias_resolves_same_command() {
        let registry = CommandRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry
            .register(CommandConfig::new("hurt").alias("dmg"), recording(tx))
            .unwrap();

        assert_eq!(
            registry.execute_name(ALICE, "dmg", ["zombie", "4"]),
            DispatchOutcome::Executed
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ("dmg".to_string(), vec!["zombie".to_string(), "4".to_string()])
        );

        assert_eq!(
            registry.execute_name(ALICE, "hurt", ["zombie"]),
            DispatchOutcome::Executed
        );
        assert_eq!(rx.recv().await.unwrap().0, "hurt");

        assert_eq!(registry.lookup("dmg"), registry.lookup("hurt"));
    }

    #[tokio::test]
    async fn test_unknown_command_not_found() {
        let registry: CommandRegistry<User> = CommandRegistry::new();
        let dispatch = registry.execute_name_tracked(ALICE, "missing", Vec::<String>::new());
        assert_eq!(dispatch.outcome, DispatchOutcome::NotFound);
        assert!(dispatch.task.is_none());
    }

    #[test]
    fn test_dispatch_outside_runtime() {
        let registry = CommandRegistry::new();
        registry.register(CommandConfig::new("hurt"), noop()).unwrap();

        let dispatch = registry.execute_name_tracked(ALICE, "hurt", ["zombie"]);
        assert_eq!(dispatch.outcome, DispatchOutcome::NoRuntime);
        assert!(dispatch.task.is_none());
        assert_eq!(
            registry.execute_name(ALICE, "missing", Vec::<String>::new()),
            DispatchOutcome::NotFound
        );
    }

    #[test]
    fn test_shared_defaults_fill_partial_config() {
        let defaults: ConfigDefaults =
            Arc::new(|partial: PartialCommandConfig| partial.description("shared"));
        let registry: CommandRegistry<User> =
            CommandRegistry::new().with_shared_defaults(Arc::clone(&defaults));

        let config = registry.register("hurt", noop()).unwrap();
        assert_eq!(config.description.as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_deregister_removes_id_and_aliases() {
        let registry = CommandRegistry::new();
        let config = registry
            .register(CommandConfig::new("hurt").alias("dmg").alias("damage"), noop())
            .unwrap();

        assert_eq!(registry.deregister(&config), 3);
        for label in ["hurt", "dmg", "damage"] {
            assert_eq!(
                registry.execute_name(ALICE, label, Vec::<String>::new()),
                DispatchOutcome::NotFound
            );
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_deregister_id_keeps_overwritten_aliases() {
        let registry = CommandRegistry::new();
        registry
            .register(CommandConfig::new("hurt").alias("dmg"), noop())
            .unwrap();
        registry
            .register(CommandConfig::new("damage").alias("dmg"), noop())
            .unwrap();

        let removed = registry.deregister_id("hurt").unwrap();
        assert_eq!(removed.id, "hurt");
        assert!(!registry.contains("hurt"));
        assert_eq!(registry.lookup("dmg").unwrap().id, "damage");
        assert_eq!(registry.deregister_id("dmg"), None);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = CommandRegistry::new();
        let (first_tx, mut first_rx) = mpsc::unbounded_channel();
        let (second_tx, mut second_rx) = mpsc::unbounded_channel();
        registry
            .register(CommandConfig::new("roll"), recording(first_tx))
            .unwrap();
        registry
            .register(CommandConfig::new("roll"), recording(second_tx))
            .unwrap();

        let task = registry
            .execute_name_tracked(ALICE, "roll", ["d20"])
            .task
            .unwrap();
        task.await.unwrap();

        assert_eq!(second_rx.recv().await.unwrap().0, "roll");
        assert!(first_rx.try_recv().is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_permission_policy_denies() {
        let registry = CommandRegistry::new()
            .with_permission_policy(|user: &User, _: &CommandConfig| user.admin);
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry
            .register(CommandConfig::new("kick"), recording(tx))
            .unwrap();

        assert_eq!(
            registry.execute_name(BOB, "kick", ["carol"]),
            DispatchOutcome::NoPermission
        );
        assert_eq!(
            registry.execute_name(ALICE, "kick", ["carol"]),
            DispatchOutcome::Executed
        );
        assert_eq!(rx.recv().await.unwrap().1, vec!["carol".to_string()]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_permission_nodes() {
        let registry = CommandRegistry::new().with_permission_policy(RequirePermission::new(
            |user: &User, node: &str| user.admin || node == "public",
        ));
        registry
            .register(CommandConfig::new("ban").permission("admin.ban"), noop())
            .unwrap();
        registry
            .register(CommandConfig::new("help").permission("public"), noop())
            .unwrap();

        assert_eq!(
            registry.execute_name(BOB, "ban", Vec::<String>::new()),
            DispatchOutcome::NoPermission
        );
        assert_eq!(
            registry.execute_name(BOB, "help", Vec::<String>::new()),
            DispatchOutcome::Executed
        );
    }

    #[tokio::test]
    async fn test_dispatch_returns_before_handler_finishes() {
        let registry = CommandRegistry::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let release_rx = Arc::new(parking_lot::Mutex::new(Some(release_rx)));

        registry
            .register(
                CommandConfig::new("wait"),
                Executor::function(move |_: User, _: Arguments, _: String| {
                    let release_rx = release_rx.lock().take();
                    async move {
                        if let Some(release_rx) = release_rx {
                            let _ = release_rx.await;
                        }
                    }
                }),
            )
            .unwrap();

        let dispatch = registry.execute_name_tracked(ALICE, "wait", Vec::<String>::new());
        assert_eq!(dispatch.outcome, DispatchOutcome::Executed);

        let task = dispatch.task.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!task.is_finished());

        release_tx.send(()).unwrap();
        assert!(task.await.unwrap().success);
    }

    #[tokio::test]
    async fn test_handler_error_reported_to_hook() {
        let registry = CommandRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.set_completion_hook(move |sender: &User, completion: &Completion| {
            let _ = tx.send((sender.name, completion.clone()));
        });

        registry
            .register(
                CommandConfig::new("fail").alias("f"),
                Executor::function(|_: User, _: Arguments, _: String| async {
                    Err::<(), _>("broken")
                }),
            )
            .unwrap();

        assert_eq!(
            registry.execute_name(ALICE, "f", Vec::<String>::new()),
            DispatchOutcome::Executed
        );
        let (sender, completion) = rx.recv().await.unwrap();
        assert_eq!(sender, "alice");
        assert_eq!(
            completion,
            Completion {
                command: "fail".into(),
                label: "f".into(),
                success: false,
            }
        );
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let registry = CommandRegistry::new();
        registry
            .register(
                CommandConfig::new("explode"),
                Executor::function(|_: User, _: Arguments, _: String| async {
                    if true {
                        panic!("handler exploded");
                    }
                }),
            )
            .unwrap();

        let dispatch = registry.execute_name_tracked(ALICE, "explode", Vec::<String>::new());
        assert_eq!(dispatch.outcome, DispatchOutcome::Executed);
        let completion = dispatch.task.unwrap().await.unwrap();
        assert!(!completion.success);
    }

    #[tokio::test]
    async fn test_handler_resolves_arguments() {
        let registry = CommandRegistry::new();
        let hurt = Descriptor::new()
            .required(parsers::any_token())
            .optional(parsers::literal("fire"))
            .required(parsers::from_str::<u32>());
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry
            .register(
                CommandConfig::new("hurt"),
                Executor::function(move |_: User, args: Arguments, _: String| {
                    let (target, element, amount) = args.resolve(&hurt);
                    let tx = tx.clone();
                    async move {
                        let Some(amount) = amount.into_option() else {
                            return false;
                        };
                        let _ = tx.send((target.into_option(), element.into_option(), amount));
                        true
                    }
                }),
            )
            .unwrap();

        registry.execute_name(ALICE, "hurt", ["zombie", "7"]);
        assert_eq!(
            rx.recv().await.unwrap(),
            (Some("zombie".to_string()), None, 7)
        );

        let completion = registry
            .execute_name_tracked(ALICE, "hurt", ["zombie", "fire"])
            .task
            .unwrap()
            .await
            .unwrap();
        assert!(!completion.success);
    }

    #[tokio::test]
    async fn test_execute_config() {
        let registry = CommandRegistry::new();
        let config = registry
            .register(CommandConfig::new("hurt").alias("dmg"), noop())
            .unwrap();

        let completion = registry
            .execute_config_tracked(ALICE, &config, ["x"])
            .task
            .unwrap()
            .await
            .unwrap();
        assert_eq!(completion.label, "hurt");

        let unknown = CommandConfig::new("dmg");
        assert_eq!(
            registry.execute_config(ALICE, &unknown, ["x"]),
            DispatchOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_defaults_fill_partial_config() {
        let registry: CommandRegistry<User> = CommandRegistry::new().with_defaults(|partial| {
            let partial = if partial.id.is_none() {
                PartialCommandConfig {
                    id: Some("fallback".into()),
                    ..partial
                }
            } else {
                partial
            };
            partial.description("no description")
        });

        let config = registry
            .register(PartialCommandConfig::default().alias("fb"), noop())
            .unwrap();
        assert_eq!(config.id, "fallback");
        assert_eq!(config.description.as_deref(), Some("no description"));
        assert!(registry.contains("fb"));
    }

    #[tokio::test]
    async fn test_register_rejects_incomplete_config() {
        let registry: CommandRegistry<User> = CommandRegistry::new();
        assert_eq!(
            registry.register(PartialCommandConfig::default(), noop()),
            Err(RegistryError::missing_field("id"))
        );
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_listing_and_stats() {
        let registry: CommandRegistry<User> = CommandRegistry::new();
        registry
            .register(CommandConfig::new("hurt").alias("dmg"), noop())
            .unwrap();
        registry.register(CommandConfig::new("heal"), noop()).unwrap();

        let ids: Vec<String> = registry.commands().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["heal", "hurt"]);
        assert_eq!(registry.labels(), ["dmg", "heal", "hurt"]);
        assert_eq!(
            registry.stats(),
            RegistryStats {
                commands: 2,
                labels: 3
            }
        );
        assert_eq!(registry.stats().to_string(), "2 commands (3 labels)");

        registry.clear();
        assert_eq!(registry.len(), 0);
    }
}
