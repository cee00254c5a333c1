//! Logging setup for Quiver applications.
//!
//! Every Quiver crate logs through `tracing`; this module installs the
//! `tracing-subscriber` pipeline that prints it. The usual entry point is the
//! `logging` section of the loaded configuration:
//!
//! ```rust,ignore
//! let config = quiver_runtime::config::load_config()?;
//! quiver_runtime::logging::init_from_config(&config.logging);
//! ```
//!
//! [`LoggingBuilder`] adjusts the same settings in code:
//!
//! ```rust,ignore
//! use quiver_runtime::config::SpanEventConfig;
//! use quiver_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("quiver_framework=debug")
//!     .span_events(SpanEventConfig::LIFECYCLE)
//!     .init();
//! ```
//!
//! Each command handler runs inside a `dispatch` span, so
//! [`SpanEventConfig::LIFECYCLE`] logs when handlers start and finish.
//! `RUST_LOG`, when set, replaces the configured base level.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig};

/// File name used when the configured path has none.
const DEFAULT_LOG_FILE: &str = "quiver.log";

/// Errors raised while installing the subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The log file could not be opened.
    #[error("Failed to open log file: {0}")]
    Appender(#[from] InitError),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        }
    }
}

fn fmt_span(events: SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |span, (_, flag)| span | flag)
}

/// Installs logging from configuration.
///
/// A subscriber installed earlier by the host application is left in place.
pub fn init_from_config(config: &LoggingConfig) {
    if let Err(LoggingError::Appender(e)) = LoggingBuilder::from_config(config).try_init() {
        eprintln!("Failed to initialize logging: {e}");
    }
}

/// Builds and installs the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    /// `target=level` directives applied on top of the base level.
    directives: Vec<String>,
    with_target: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Starts from [`LoggingConfig::default`].
    pub fn new() -> Self {
        Self::from_config(&LoggingConfig::default())
    }

    /// Starts from `config`. Its per-target filters become directives,
    /// ordered by target.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by_key(|&(target, _)| target);

        Self {
            directives: filters
                .into_iter()
                .map(|(target, level)| format!("{target}={level}"))
                .collect(),
            config: config.clone(),
            with_target: true,
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Adds a directive such as `quiver_core=trace`. Invalid directives are
    /// reported and skipped at installation.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn span_events(mut self, events: SpanEventConfig) -> Self {
        self.config.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    /// Writes to `path`, switching the output to [`LogOutput::File`].
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = LogOutput::File;
        self.config.file_path = Some(path.into());
        self
    }

    pub fn rotation(mut self, rotation: LogRotation, max_files: u32) -> Self {
        self.config.rotation = rotation;
        self.config.max_files = max_files;
        self
    }

    pub fn thread_ids(mut self, enabled: bool) -> Self {
        self.config.thread_ids = enabled;
        self
    }

    /// Includes the source file and line of each event.
    pub fn file_location(mut self, enabled: bool) -> Self {
        self.config.file_location = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    fn filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));

        for directive in &self.directives {
            match directive.parse() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(e) => eprintln!("Ignoring invalid log directive {directive:?}: {e}"),
            }
        }
        filter
    }

    fn appender(&self, path: &Path) -> Result<RollingFileAppender, InitError> {
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let prefix: Cow<'_, str> = path
            .file_name()
            .map_or(Cow::Borrowed(DEFAULT_LOG_FILE), |name| name.to_string_lossy());

        RollingFileAppender::builder()
            .rotation(self.config.rotation.into())
            .filename_prefix(prefix)
            .max_log_files(self.config.max_files.max(1) as usize)
            .build(directory)
    }

    /// Installs the subscriber, ignoring failure.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    ///
    /// File output without a configured path falls back to stdout.
    pub fn try_init(self) -> Result<(), LoggingError> {
        let config = &self.config;
        let spans = fmt_span(config.span_events);

        macro_rules! install {
            (@decorate $layer:expr) => {
                $layer
                    .with_span_events(spans)
                    .with_target(self.with_target)
                    .with_thread_ids(config.thread_ids)
                    .with_file(config.file_location)
                    .with_line_number(config.file_location)
            };
            ($writer:expr) => {{
                let registry = tracing_subscriber::registry().with(self.filter());
                match config.format {
                    LogFormat::Compact => registry
                        .with(install!(@decorate fmt::layer().compact()).with_writer($writer))
                        .try_init(),
                    LogFormat::Full => registry
                        .with(install!(@decorate fmt::layer()).with_writer($writer))
                        .try_init(),
                    LogFormat::Pretty => registry
                        .with(install!(@decorate fmt::layer().pretty()).with_writer($writer))
                        .try_init(),
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => registry
                        .with(fmt::layer().json().with_span_events(spans).with_writer($writer))
                        .try_init(),
                }
            }};
        }

        match (config.output, config.file_path.as_deref()) {
            (LogOutput::Stdout, _) => install!(std::io::stdout)?,
            (LogOutput::Stderr, _) => install!(std::io::stderr)?,
            (LogOutput::File, Some(path)) => {
                let appender = self.appender(path)?;
                install!(appender)?
            }
            (LogOutput::File, None) => {
                install!(std::io::stdout)?;
                warn!("File output requested without logging.file_path, writing to stdout");
            }
        }
        Ok(())
    }
}
