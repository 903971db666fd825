//! Errors raised while resolving configuration.

use thiserror::Error;

/// Configuration problems detected before any repository is touched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Layered loading (CLI, environment, files) failed.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Error detail from ortho-config.
        message: String,
    },

    /// A required key has no value after all layers were merged.
    #[error("configuration key `{key}` is required")]
    Missing {
        /// Key name as written in configuration files.
        key: &'static str,
    },

    /// The password file could not be read.
    #[error("failed to read password file {path}: {message}")]
    SecretFile {
        /// Path that was read.
        path: String,
        /// I/O error detail.
        message: String,
    },

    /// A secret resolved to an empty string.
    #[error("credential `{key}` must not be blank")]
    BlankSecret {
        /// Key the blank secret came from.
        key: &'static str,
    },

    /// The remote overlay was not a JSON object of known keys.
    #[error("remote configuration overlay is invalid: {message}")]
    InvalidOverlay {
        /// Deserialisation error detail.
        message: String,
    },

    /// A URL template or endpoint could not be used.
    #[error("configuration key `{key}` is invalid: {message}")]
    Invalid {
        /// Key name as written in configuration files.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}
