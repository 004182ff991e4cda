//! Tracing subscriber setup
//!
//! ## Example
//!
//! ```rust,ignore
//! use aog_core::observability::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AdapterError;

/// Crates whose events the installed filter lets through.
const TARGETS: &[&str] = &[
    "aog_core",
    "aog_provider_ollama",
    "aog_provider_deepseek",
    "aog_provider_tencent",
    "aog_provider_baidu",
];

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(AdapterError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// What [`init_subscriber`] installs.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Filter directive covering every adapter crate.
    pub fn filter_directive(&self) -> String {
        let level = self.log_level.as_str().to_lowercase();
        TARGETS
            .iter()
            .map(|t| format!("{t}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Builder for [`SubscriberConfig`].
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Parse `trace`, `debug`, `info`, `warn` or `error` (any case).
    pub fn log_level_str(mut self, level: &str) -> Result<Self, AdapterError> {
        let level = level.parse::<tracing::Level>().map_err(|_| {
            AdapterError::ConfigurationError(format!(
                "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))
        })?;
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            log_file: self.log_file,
        }
    }
}

fn writer(log_file: Option<&PathBuf>) -> Result<(BoxMakeWriter, Option<WorkerGuard>), AdapterError> {
    let Some(path) = log_file else {
        return Ok((BoxMakeWriter::new(std::io::stderr), None));
    };
    let file_name = path.file_name().ok_or_else(|| {
        AdapterError::ConfigurationError(format!("Invalid log file path: {}", path.display()))
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(non_blocking), Some(guard)))
}

/// Install a global subscriber.
///
/// Returns the file writer guard when logging to a file; keep it alive for
/// the life of the process. An already-installed subscriber is left in
/// place and reported as success.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, AdapterError> {
    let filter = config.filter_directive();
    let (make_writer, guard) = writer(config.log_file.as_ref())?;

    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_target(true)
            .json()
            .flatten_event(true)
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_target(true)
            .try_init(),
    };

    match init_result {
        Ok(()) => Ok(guard),
        Err(e) => {
            let error_msg = e.to_string();
            // Either the dispatcher or the `log` bridge was installed earlier.
            if error_msg.contains("already been set") || error_msg.contains("already initialized") {
                Ok(None)
            } else {
                Err(AdapterError::ConfigurationError(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Install a subscriber configured from the environment.
///
/// - `AOG_LOG_LEVEL`: trace, debug, info, warn, error
/// - `AOG_LOG_FORMAT`: text, json, json-compact
/// - `AOG_LOG_FILE`: log file path
pub fn init_from_env() -> Result<Option<WorkerGuard>, AdapterError> {
    init_subscriber(SubscriberConfig::from_lookup(|key| std::env::var(key).ok())?)
}

impl SubscriberConfig {
    /// Read `AOG_LOG_LEVEL`, `AOG_LOG_FORMAT` and `AOG_LOG_FILE` through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AdapterError> {
        let mut builder = Self::builder();
        if let Some(level) = lookup("AOG_LOG_LEVEL") {
            builder = builder.log_level_str(&level)?;
        }
        if let Some(format) = lookup("AOG_LOG_FORMAT") {
            builder = builder.output_format(format.parse()?);
        }
        if let Some(file_path) = lookup("AOG_LOG_FILE") {
            builder = builder.log_file(PathBuf::from(file_path));
        }
        Ok(builder.build())
    }
}
