//! Quiver Runtime
//!
//! Everything needed to run a Quiver command console:
//!
//! - [`config`]: layered settings from defaults, files and `QUIVER_*`
//!   variables, with validation
//! - [`logging`]: a `tracing-subscriber` pipeline driven by those settings
//! - [`CommandRuntime`]: reads input lines, recognises the configured prefix
//!   and dispatches commands to a registry that applies configured overrides
//!
//! ```rust,ignore
//! use quiver_framework::Executor;
//! use quiver_runtime::CommandRuntime;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = CommandRuntime::<String>::builder().profile("dev").build()?;
//!     runtime.register("ping", Executor::function(ping))?;
//!
//!     // Stops at end of input or on Ctrl+C.
//!     runtime.run(BufReader::new(tokio::io::stdin()), "console".into()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    CommandOverride, CommandsConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig,
    QuiverConfig, SpanEventConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, LoggingError};
pub use runtime::{CommandRuntime, RuntimeBuilder, RuntimeStats};

// Applications log through the same `tracing` version as Quiver.
pub use tracing;
pub use tracing_subscriber;

/// `tracing` macros for command handlers.
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
