//! Storage module: resolves the credential and binds the client

use crate::{LaunchConfig, Registry, Result};
use dbx_client::{Config, ConfigLookup, Credential, StorageClient, StorageService};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Registers a Dropbox [`StorageClient`] with a [`Registry`].
///
/// The access token is taken from [`StorageModule::access_token`] when set,
/// otherwise from `storage.accessToken` in the launch configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageModule {
    access_token: Option<String>,
    config: Config,
}

impl StorageModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit token instead of the launch configuration
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Use a custom client configuration (endpoints, identifier, timeout)
    pub fn with_client_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn client_config(&self) -> &Config {
        &self.config
    }

    /// Build a client from the explicit token or `lookup`
    pub fn provide_client(&self, lookup: &dyn ConfigLookup) -> Result<StorageClient> {
        let credential = Credential::resolve(self.access_token.clone(), lookup);
        if credential.is_undefined() {
            warn!("No storage access token configured; requests will be rejected");
        }

        Ok(StorageClient::new(self.config.clone(), credential)?)
    }

    /// Build the client and bind it as both `StorageClient` and
    /// `dyn StorageService`. Returns the bound instance.
    #[instrument(skip_all)]
    pub fn configure(&self, registry: &Registry, launch: &LaunchConfig) -> Result<Arc<StorageClient>> {
        let client = Arc::new(self.provide_client(launch)?);

        registry.bind(Arc::clone(&client));
        let service: Arc<dyn StorageService> = client.clone();
        registry.bind(service);

        info!(
            "Storage service registered (api: {})",
            self.config.api_endpoint
        );
        Ok(client)
    }
}
