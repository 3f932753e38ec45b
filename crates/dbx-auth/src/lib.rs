//! # Dbx Auth
//!
//! OAuth2 authorization-code flow without a redirect URI: the user opens
//! the authorization page, approves the app, and pastes the displayed code
//! back; the code is then exchanged for a bearer access token.

mod error;
mod prompt;
mod web_auth;

pub use error::{AuthError, Result};
pub use prompt::authorize_interactively;
pub use web_auth::{WebAuthNoRedirect, DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL};
