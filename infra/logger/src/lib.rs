//! # Logger
//!
//! One place to install the global `tracing` subscriber for every binary in the workspace.
//! Console output, a rolling log file (optionally JSON) and an `EnvFilter` are composed as
//! layers on a single registry.
//!
//! `RUST_LOG` is honoured unless [`LoggerBuilder::env_filter`] sets an explicit directive.
//!
//! ## Example
//!
//! ```rust
//! # use abect_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("abect-server")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Rolling file output settings.
#[derive(Debug, Clone)]
pub struct FileOutput {
    pub path: PathBuf,
    pub rotation: Rotation,
    pub max_files: usize,
    pub json: bool,
}

impl FileOutput {
    /// Daily rotation, ten files kept, plain text.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileOutput>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { console: true, level: LevelFilter::INFO, env_filter: None, file: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl private::Sealed for NoName {}
impl private::Sealed for WithName {}

/// A builder for configuring and installing the global tracing subscriber.
///
/// The logger name is mandatory; it prefixes rolling files (`abect-server.2026-10-14.log`).
#[derive(Debug)]
pub struct LoggerBuilder<N: private::Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl<N: private::Sealed> LoggerBuilder<N> {
    /// Minimum level emitted when no `RUST_LOG`/explicit directive overrides it.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Explicit filter directive (e.g. `abect_calculator=debug,hyper=info`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Adds a rolling file layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn file(mut self, output: FileOutput) -> Self {
        self.config.file = Some(output);
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Consumes the builder and installs the global subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle holding the non-blocking writer guard; keep it alive until
    /// shutdown or buffered file output is lost.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`, an invalid
    ///   filter directive, or when no output is enabled.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { config, name: WithName(name) } = self;
        validate(&config, &name)?;

        let filter = env_filter(&config)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if config.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match config.file {
            Some(output) => {
                let (file_layer, guard) = file_layer(&name, output)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .context("Installing global subscriber")?;

        tracing::debug!(logger = %name, "Logging initialized");
        Ok(Logger { guard })
    }
}

fn file_layer(name: &str, output: FileOutput) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&output.path)
        .context(format!("Failed to create log directory: {}", output.path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(output.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(output.max_files)
        .build(&output.path)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let base = layer().with_writer(writer).with_ansi(false);
    let boxed = if output.json { base.json().boxed() } else { base.boxed() };

    Ok((boxed, guard))
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a new [`LoggerBuilder`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Returns the file writer guard, present only when file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.file.as_ref().is_some_and(|f| f.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("abect-test");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert!(builder.config.file.is_none());
        assert!(builder.config.env_filter.is_none());
    }

    #[test]
    fn file_output_options_are_recorded() {
        let builder = Logger::builder()
            .name("abect-test")
            .env_filter("abect_calculator=debug")
            .file(FileOutput::new("/tmp/abect-logs").max_files(3).json());

        let file = builder.config.file.as_ref().unwrap();
        assert_eq!(file.max_files, 3);
        assert!(file.json);
        assert_eq!(builder.config.env_filter.as_deref(), Some("abect_calculator=debug"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("   ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn zero_max_files_is_rejected() {
        let err = Logger::builder()
            .name("abect-test")
            .file(FileOutput::new("/tmp/abect-logs").max_files(0))
            .init()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn no_output_is_rejected() {
        let err = Logger::builder().name("abect-test").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let err =
            Logger::builder().name("abect-test").env_filter("abect=notalevel").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
