use std::path::PathBuf;

use thiserror::Error;

/// Errors that make a probe run impossible.
/// These are returned to the caller before any network activity takes place.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("only http and https are supported, got '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to load TLS material from {}: {reason}", path.display())]
    TlsMaterial { path: PathBuf, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
