use nova_core::{LineCol, Span};
use thiserror::Error;

use crate::entity::EntityType;

/// Reasons a method body cannot be turned into a tree.
///
/// Conversion is all-or-nothing: when any of these is returned, the target
/// tree is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("unsupported {kind} at {location}")]
    Unsupported {
        kind: &'static str,
        span: Span,
        location: LineCol,
    },

    /// Offsets are half-open (`start..end`), as received from the parser.
    #[error("malformed source range {start}..{end} in a source of {len} bytes")]
    MalformedRange { start: usize, end: usize, len: usize },

    #[error("{entity} value {expected:?} does not match its source text {actual:?}")]
    RangeMismatch {
        entity: EntityType,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Error)]
pub enum DistillError {
    #[error("method `{name}` not found")]
    MethodNotFound { name: String },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_owned())
    }
}
