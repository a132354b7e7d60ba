//! Error handling for SonoView
//!
//! Provides the error types shared by the annotation engine:
//! - Tool errors (interaction surface)
//! - Configuration errors (settings files and validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Tool error type
///
/// Raised by the interaction surface when a tool request cannot be honoured.
/// The active tool is never changed when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Tool name is not recognised
    #[error("Unknown tool: {name}")]
    Unknown {
        /// The rejected tool name.
        name: String,
    },
}

/// Configuration error type
///
/// Represents problems loading, saving or validating engine settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File extension is neither `.json` nor `.toml`
    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat {
        /// The offending file extension.
        extension: String,
    },

    /// File contents could not be parsed
    #[error("Failed to parse config: {reason}")]
    Parse {
        /// The parser's message.
        reason: String,
    },

    /// File contents could not be serialized
    #[error("Failed to serialize config: {reason}")]
    Serialize {
        /// The serializer's message.
        reason: String,
    },

    /// A setting holds a value outside its allowed range
    #[error("Invalid value for {setting}: {reason}")]
    InvalidValue {
        /// The setting name, as `section.field`.
        setting: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Main error type for SonoView
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a tool error
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Error::Tool(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
