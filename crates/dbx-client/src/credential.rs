//! Bearer credential resolution

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Configuration key holding the access token
pub const ACCESS_TOKEN_KEY: &str = "storage.accessToken";

/// Token used when neither an explicit value nor configuration supplies one
pub const UNDEFINED_TOKEN: &str = "UNDEFINED";

/// Read access to an external configuration source.
pub trait ConfigLookup {
    /// Value stored under `key`, or `default` when absent
    fn lookup(&self, key: &str, default: &str) -> String;
}

impl<F> ConfigLookup for F
where
    F: Fn(&str, &str) -> String,
{
    fn lookup(&self, key: &str, default: &str) -> String {
        self(key, default)
    }
}

impl ConfigLookup for HashMap<String, String> {
    fn lookup(&self, key: &str, default: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| default.to_string())
    }
}

/// Opaque bearer token, immutable once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    /// Wrap a token as-is
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    /// Resolve the token from an explicit override or the configuration.
    ///
    /// The explicit value wins verbatim; otherwise `storage.accessToken` is
    /// looked up with `"UNDEFINED"` as the default. The token is not
    /// validated here.
    pub fn resolve(explicit: Option<String>, lookup: &dyn ConfigLookup) -> Self {
        match explicit {
            Some(token) => Self::new(token),
            None => Self::new(lookup.lookup(ACCESS_TOKEN_KEY, UNDEFINED_TOKEN)),
        }
    }

    /// The raw token
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Whether resolution fell through to the placeholder
    pub fn is_undefined(&self) -> bool {
        &*self.0 == UNDEFINED_TOKEN
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}
