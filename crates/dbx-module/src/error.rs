//! Bootstrap error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors raised while loading configuration or wiring services
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Configuration sources could not be read or merged
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The storage client could not be built
    #[error("storage client error: {0}")]
    Client(#[from] dbx_client::ClientError),

    /// Nothing is bound for the requested type
    #[error("no binding registered for {0}")]
    Unbound(&'static str),
}
