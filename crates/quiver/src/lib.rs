//! # Quiver
//!
//! Typed argument resolution and command dispatch for text-driven bots and
//! consoles.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌──────────────────┐   ┌──────────────────────────┐
//! │ input line│──▶│ Tokenizer │──▶│ CommandRegistry  │──▶│ handler (own Tokio task) │
//! └───────────┘   └───────────┘   │ name/alias/policy│   │ Arguments + Descriptor   │
//!                                 └──────────────────┘   └──────────────────────────┘
//! ```
//!
//! - **quiver-core**: value parsers, slots, the token cursor resolver and the
//!   `Arguments` buffer
//! - **quiver-framework**: command configuration, executors, the registry and
//!   dispatcher
//! - **quiver-runtime**: configuration, logging and the line-driven runtime
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quiver::prelude::*;
//!
//! let hurt = Descriptor::new()
//!     .required(parsers::any_token())
//!     .required(parsers::from_str::<u32>());
//!
//! let runtime = CommandRuntime::<String>::builder().build()?;
//! runtime.register(
//!     CommandConfig::new("hurt").alias("dmg"),
//!     Executor::function(move |sender: String, args: Arguments, _label: String| {
//!         let (target, amount) = args.resolve(&hurt);
//!         async move {
//!             let (Some(target), Some(amount)) = (target.into_option(), amount.into_option()) else {
//!                 return false;
//!             };
//!             println!("{sender} hurts {target} for {amount}");
//!             true
//!         }
//!     }),
//! )?;
//!
//! runtime.handle_line("console".into(), "/dmg zombie 4");
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use quiver_core as core;
pub use quiver_framework as framework;
pub use quiver_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use quiver::prelude::*;
/// ```
pub mod prelude {
    // Argument resolution
    pub use quiver_core::{
        Alternatives, Arguments, CollectAll, Descriptor, Slot, ValueParser, ValueParserExt,
        parsers,
    };

    // Commands and dispatch
    pub use quiver_framework::{
        CommandConfig, CommandExecutor, CommandRegistry, Completion, DispatchOutcome, Executor,
        HandlerResult, PartialCommandConfig, PermissionPolicy, RequirePermission, Tokenizer,
        async_trait,
    };

    // Runtime
    pub use quiver_runtime::{CommandRuntime, QuiverConfig};
}
