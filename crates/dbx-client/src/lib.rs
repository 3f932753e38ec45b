//! # Dbx Client
//!
//! A Dropbox API v2 storage client with typed entries and errors.
//!
//! ## Features
//!
//! - **Streaming**: uploads stream from disk with a known length, downloads
//!   stream into any async sink
//! - **Typed errors**: every failure is one of a small set of [`ErrorKind`]s
//! - **Shareable**: one client serves concurrent callers behind an `Arc`
//! - **Blocking facade**: [`blocking::StorageClient`] for synchronous callers
//!
//! ## Example
//!
//! ```rust,ignore
//! use dbx_client::{Config, Credential, StorageClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StorageClient::new(Config::default(), Credential::new("your-token"))?;
//!
//!     client.create_folder("/reports/2024").await?;
//!     let file = client.upload("q1.pdf", "/reports/2024/q1.pdf").await?;
//!     println!("uploaded {} bytes, rev {}", file.size, file.revision);
//!
//!     for entry in client.list("/reports/2024").await? {
//!         println!("{}", entry.path());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod blocking;
mod client;
mod config;
mod credential;
mod error;
mod path;
mod service;
mod transport;
mod types;
mod wire;

pub use client::StorageClient;
pub use config::{
    default_locale, Config, DEFAULT_API_ENDPOINT, DEFAULT_CLIENT_IDENTIFIER,
    DEFAULT_CONTENT_ENDPOINT,
};
pub use credential::{ConfigLookup, Credential, ACCESS_TOKEN_KEY, UNDEFINED_TOKEN};
pub use error::{ClientError, ErrorKind, Result};
pub use path::{is_root, normalize_path};
pub use service::StorageService;
pub use transport::{TransportError, API_ARG_HEADER, API_RESULT_HEADER};
pub use types::*;
