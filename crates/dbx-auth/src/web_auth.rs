//! No-redirect web authorization

use crate::{AuthError, Result};
use dbx_client::{default_locale, DEFAULT_CLIENT_IDENTIFIER};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RequestTokenError, TokenResponse, TokenUrl,
};
use tracing::{debug, instrument};

/// Dropbox authorization page
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.dropbox.com/oauth2/authorize";

/// Dropbox token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

type OAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization-code flow for apps that cannot receive a redirect
pub struct WebAuthNoRedirect {
    client: OAuthClient,
    http: reqwest::Client,
    locale: String,
}

impl WebAuthNoRedirect {
    /// Flow against the public Dropbox endpoints
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(app_key, app_secret, DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL)
    }

    /// Flow against custom authorize and token endpoints
    pub fn with_endpoints(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        authorize_url: &str,
        token_url: &str,
    ) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(app_key.into()))
            .set_client_secret(ClientSecret::new(app_secret.into()))
            .set_auth_uri(AuthUrl::new(authorize_url.to_string())?)
            .set_token_uri(TokenUrl::new(token_url.to_string())?);

        // The token endpoint is never followed across redirects
        let http = reqwest::Client::builder()
            .user_agent(DEFAULT_CLIENT_IDENTIFIER)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            http,
            locale: default_locale(),
        })
    }

    /// Override the locale shown on the authorization page
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// URL of the page where the user approves the app and receives a code
    pub fn start(&self) -> String {
        let (url, _state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_extra_param("locale", self.locale.clone())
            .url();
        url.to_string()
    }

    /// Exchange the code shown to the user for an access token.
    ///
    /// Surrounding whitespace is ignored; an empty code fails without a
    /// request.
    #[instrument(skip_all)]
    pub async fn finish(&self, code: &str) -> Result<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }

        debug!("Exchanging authorization code");
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(resp) => {
                    AuthError::Exchange(match resp.error_description() {
                        Some(description) => format!("{}: {}", resp.error(), description),
                        None => resp.error().to_string(),
                    })
                }
                other => AuthError::Exchange(other.to_string()),
            })?;

        Ok(token.access_token().secret().to_string())
    }
}
