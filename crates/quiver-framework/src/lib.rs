//! # Quiver Framework
//!
//! Command registration and dispatch built on top of `quiver-core`.
//!
//! This layer provides:
//! - Command configurations with aliases and registration-time defaults
//! - Function and object executors behind one [`Executor`] type
//! - A [`CommandRegistry`] that resolves names and aliases, checks a
//!   [`PermissionPolicy`] and runs handlers on the Tokio runtime
//! - A prefix [`Tokenizer`] for turning raw input lines into invocations
//! - A [`tower::Service`] implementation for the registry
//!
//! Argument parsing itself lives in `quiver-core`; handlers receive an owned
//! [`Arguments`](quiver_core::Arguments) buffer and resolve it however they like.

pub mod command;
pub mod error;
pub mod executor;
pub mod permission;
pub mod registry;
pub mod service;
pub mod tokenizer;

pub use command::{CommandConfig, ConfigDefaults, PartialCommandConfig};
pub use error::{RegistryError, RegistryResult};
pub use executor::{CommandExecutor, Executor, HandlerFn, HandlerResult, IntoHandlerResult};
pub use permission::{AllowAll, PermissionPolicy, RequirePermission};
pub use registry::{
    CommandRegistry, Completion, CompletionHook, Dispatch, DispatchOutcome, RegistryStats,
};
pub use service::CommandRequest;
pub use tokenizer::{DEFAULT_PREFIX, Invocation, Tokenizer};

// Re-exported for implementing `CommandExecutor`.
pub use async_trait::async_trait;
