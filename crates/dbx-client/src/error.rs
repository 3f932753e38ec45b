//! Client error types and the transport-to-client error translation

use crate::transport::TransportError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential missing, invalid or expired
    Auth,
    /// No entry at the requested path
    NotFound,
    /// An entry already occupies the requested path
    Conflict,
    /// Local file or sink failure
    Io,
    /// Any other server-reported error
    Api,
    /// Connection or stream failure
    Network,
}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credential rejected
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Entry not found
    #[error("not found: {path} ({summary})")]
    NotFound { path: String, summary: String },

    /// Entry already exists
    #[error("conflict at {path} ({summary})")]
    Conflict { path: String, summary: String },

    /// Local IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server-reported error outside the other kinds
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(#[source] TransportError),
}

impl ClientError {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth { .. } => ErrorKind::Auth,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Io(_) => ErrorKind::Io,
            Self::Api { .. } => ErrorKind::Api,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Check if the credential was rejected
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Translate a transport failure for an operation on `path`.
    pub fn from_transport(err: TransportError, path: &str) -> Self {
        match err {
            TransportError::LocalRead(e) => Self::Io(e),
            TransportError::Status { status, body } => from_status(status, body, path),
            err @ TransportError::Decode(_) => Self::Api {
                status: None,
                message: "malformed response".to_string(),
                source: Some(err),
            },
            err @ TransportError::Build(_) => Self::Api {
                status: None,
                message: "request could not be built".to_string(),
                source: Some(err),
            },
            err @ (TransportError::Connect(_)
            | TransportError::Body(_)
            | TransportError::Truncated { .. }) => Self::Network(err),
        }
    }
}

/// Dropbox error envelope returned with 4xx/5xx responses
#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct ErrorResponse {
    error_summary: String,
}

/// The vendor `error_summary`, or the raw body when it is not JSON.
pub(crate) fn error_summary(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) if !resp.error_summary.is_empty() => resp.error_summary,
        _ => body.trim().to_string(),
    }
}

fn from_status(status: StatusCode, body: String, path: &str) -> ClientError {
    let summary = error_summary(&body);

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Auth { message: summary },
        StatusCode::NOT_FOUND => ClientError::NotFound {
            path: path.to_string(),
            summary,
        },
        // 409 is endpoint-specific; the summary names the cause,
        // e.g. `path/not_found/..`, `path_lookup/not_found/..`, `path/conflict/file/..`
        StatusCode::CONFLICT if summary.contains("not_found") || summary.contains("not_folder") => {
            ClientError::NotFound {
                path: path.to_string(),
                summary,
            }
        }
        StatusCode::CONFLICT if summary.contains("conflict") => ClientError::Conflict {
            path: path.to_string(),
            summary,
        },
        status => ClientError::Api {
            status: Some(status.as_u16()),
            message: summary,
            source: None,
        },
    }
}
