//! Helix app access tokens via the OAuth2 client-credentials grant.
//!
//! Tokens are fetched lazily on the first request and reused until shortly
//! before they expire.

use std::time::{Duration, Instant};

use oauth2::basic::BasicClient;
use oauth2::{ClientId, ClientSecret, TokenResponse, TokenUrl};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{ApiError, Result};

/// Twitch token endpoint.
pub const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Refresh this long before the server-side expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
/// Assumed lifetime when the token response carries no `expires_in`.
const FALLBACK_LIFETIME: Duration = Duration::from_secs(55 * 60);

#[derive(Debug, Clone)]
struct AppToken {
    secret: String,
    expires_at: Instant,
}

impl AppToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Hands out a valid bearer token, requesting a new one when needed.
#[derive(Debug)]
pub struct TokenProvider {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: reqwest::Client,
    token: Mutex<Option<AppToken>>,
}

impl TokenProvider {
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self> {
        Self::with_token_url(client_id, client_secret, TOKEN_URL)
    }

    pub fn with_token_url(client_id: &str, client_secret: &str, token_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            // The token endpoint never redirects; following one would leak the secret.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: token_url.to_string(),
            http,
            token: Mutex::new(None),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Current access token, fetching a new one if none is cached or it expired.
    pub async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.secret.clone());
        }

        let fresh = self.request_token().await?;
        let secret = fresh.secret.clone();
        *token = Some(fresh);
        Ok(secret)
    }

    /// Forget the cached token so the next call requests a new one.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }

    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn request_token(&self) -> Result<AppToken> {
        debug!("requesting app access token");
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(TokenUrl::new(self.token_url.clone())?);

        let response = client
            .exchange_client_credentials()
            .request_async(&self.http)
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        let lifetime = response
            .expires_in()
            .map_or(FALLBACK_LIFETIME, |d| d.saturating_sub(EXPIRY_MARGIN));

        Ok(AppToken {
            secret: response.access_token().secret().clone(),
            expires_at: Instant::now() + lifetime,
        })
    }
}
