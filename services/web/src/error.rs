//! services/web/src/error.rs
//!
//! Startup errors for the two web binaries. Request-time failures never reach this
//! type; handlers turn them into JSON error responses.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The environment held an unusable value.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An outbound HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A page template failed to parse.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Binding or serving the listener failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
