use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};

use crate::error::{Result, SyncError};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Trades the stored refresh token for short-lived Calendar API access tokens.
pub struct GoogleOAuthClient {
    client: BasicClient,
}

impl GoogleOAuthClient {
    pub fn new(client_id: &str, client_secret: Option<&str>) -> Result<Self> {
        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
            .map_err(|e| SyncError::Config(format!("Invalid OAuth auth URL: {e}")))?;
        let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
            .map_err(|e| SyncError::Config(format!("Invalid OAuth token URL: {e}")))?;

        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            client_secret.map(|secret| ClientSecret::new(secret.to_string())),
            auth_url,
            Some(token_url),
        );

        Ok(Self { client })
    }

    pub fn access_token(&self, refresh_token: &str) -> Result<String> {
        let token = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request(oauth2::reqwest::http_client)
            .map_err(|e| SyncError::Calendar(format!("Failed to refresh access token: {e}")))?;

        if let Some(expires_in) = token.expires_in() {
            tracing::debug!("Access token valid for {}s", expires_in.as_secs());
        }

        Ok(token.access_token().secret().to_string())
    }
}
