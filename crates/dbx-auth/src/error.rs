//! Auth helper error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid OAuth2 endpoint: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no authorization code entered")]
    EmptyCode,

    #[error("token exchange failed: {0}")]
    Exchange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
