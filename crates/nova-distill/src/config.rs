use std::path::Path;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::Layer as _;

use crate::error::ConfigError;

/// Top-level configuration, usually read from a `distill.toml` file.
///
/// Every field is optional; an empty document yields [`DistillConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistillConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub conversion: ConversionOptions,
}

impl DistillConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionOptions {
    /// Check every created entity's range against the source buffer, and
    /// that verbatim values reproduce their source slice.
    #[serde(default = "ConversionOptions::default_verify_ranges")]
    pub verify_ranges: bool,
}

impl ConversionOptions {
    fn default_verify_ranges() -> bool {
        true
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            verify_ranges: Self::default_verify_ranges(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A bare level for the distiller's own targets, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Targets a bare `level` applies to.
    const TARGETS: [&'static str; 2] = ["nova.distill", "nova_syntax"];

    fn default_level() -> String {
        "info".to_owned()
    }

    /// Filter directives for this config.
    ///
    /// A bare level (`debug`, `warning`, ...) applies to the distiller's own
    /// targets while everything else stays at `warn`. Any other text is used
    /// as a full directive string.
    pub fn directives(&self) -> String {
        let level = self.level.trim();
        match bare_level(level) {
            Some(level) => Self::TARGETS
                .iter()
                .fold("warn".to_owned(), |out, target| format!("{out},{target}={level}")),
            None => level.to_owned(),
        }
    }

    /// The effective filter: [`Self::directives`] followed by `RUST_LOG`, so
    /// that environment directives win for the targets they name.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let mut directives = self.directives();
        if let Some(env) = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            directives.push(',');
            directives.push_str(env.trim());
        }
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .parse_lossy(directives)
    }
}

fn bare_level(text: &str) -> Option<&'static str> {
    match text.to_ascii_lowercase().as_str() {
        "" | "info" => Some("info"),
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs a global `tracing` subscriber writing to stderr.
///
/// Only the first call has an effect. Returns `true` if this call installed
/// the subscriber.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer);
        installed = tracing::subscriber::set_global_default(subscriber).is_ok();
        if installed {
            tracing::debug!(target: "nova.distill", level = %config.level, json = config.json, "tracing initialized");
        }
    });
    installed
}
