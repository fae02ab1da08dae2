//! Error handling for oast-decode

use thiserror::Error;

/// Main error type for oast-decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OastError {
    #[error("invalid base32hex length: expected 20 characters, got {actual}")]
    InvalidLength { actual: usize },

    #[error("invalid base32hex character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("empty input")]
    EmptyInput,

    #[error("subdomain too long")]
    SubdomainTooLong,

    #[error("subdomain too short: {actual} chars (minimum 20)")]
    SubdomainTooShort { actual: usize },

    #[error("preamble contains invalid base32hex characters")]
    InvalidPreamble,

    #[error("failed to decode preamble")]
    PreambleDecodeFailed,

    #[error("out of memory while collecting matches")]
    OutOfMemory,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl OastError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// True for failures produced by the decoder itself (as opposed to I/O or usage).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::SubdomainTooLong
                | Self::SubdomainTooShort { .. }
                | Self::InvalidPreamble
                | Self::PreambleDecodeFailed
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check OAST_FORMAT / OAST_PRETTY in your environment or .env file", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Parse { message } => {
                format!("❌ Parse error: {}", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
            Self::OutOfMemory => {
                "❌ Ran out of memory collecting matches\n💡 Split the input into smaller chunks".to_string()
            }
            other => format!("❌ {}", other),
        }
    }
}

impl From<serde_json::Error> for OastError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<std::io::Error> for OastError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OastError>;

/// Helper macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::OastError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::OastError::config(format!($fmt, $($arg)*))
    };
}
