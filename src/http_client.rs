//! Authenticated JSON transport for the Twitch Helix API.
//!
//! Features:
//! - Connection pooling with keep-alive
//! - `Client-ID` and bearer headers on every request
//! - Non-2xx statuses surfaced as [`ApiError::Status`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::{ApiError, Result};

/// Helix REST root. Endpoints are joined onto it (`streams`, `games`).
pub const HELIX_BASE: &str = "https://api.twitch.tv/helix/";

/// Query parameters. Keys may repeat (`user_login=a&user_login=b`).
pub type Params = [(String, String)];

/// Issues a GET against an API endpoint and returns the decoded JSON body.
///
/// This is the seam between the fetch logic and the network; tests plug in
/// scripted implementations.
#[async_trait]
pub trait JsonGet: Send + Sync {
    async fn get_json(&self, endpoint: &str, params: &Params) -> Result<Value>;
}

/// Shared builder settings for every client in this crate.
pub(crate) fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("twitchbrowser/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .use_rustls_tls()
        .gzip(true)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
}

/// Decode a response, mapping non-2xx statuses to [`ApiError::Status`].
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value> {
    let url = response.url().to_string();
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.to_string(),
            url,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ApiError::Transport { url, source })?;
    Ok(serde_json::from_str(&body)?)
}

/// Helix client holding the app credentials.
pub struct HelixClient {
    client: Client,
    base: Url,
    tokens: TokenProvider,
}

impl HelixClient {
    pub fn new(tokens: TokenProvider) -> Result<Self> {
        Self::with_base(tokens, HELIX_BASE)
    }

    /// Point the client at another Helix-compatible root.
    pub fn with_base(tokens: TokenProvider, base: &str) -> Result<Self> {
        let client = build_client().map_err(|source| ApiError::Transport {
            url: base.to_string(),
            source,
        })?;
        Ok(Self {
            client,
            base: Url::parse(base)?,
            tokens,
        })
    }

    fn endpoint_url(&self, endpoint: &str, params: &Params) -> Result<Url> {
        let mut url = self.base.join(endpoint)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }
}

#[async_trait]
impl JsonGet for HelixClient {
    #[instrument(skip(self, params), fields(params = params.len()))]
    async fn get_json(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let url = self.endpoint_url(endpoint, params)?;
        let token = self.tokens.access_token().await?;
        debug!(%url, "helix request");

        let response = self
            .client
            .get(url.clone())
            .header("Client-ID", self.tokens.client_id())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Token revoked server-side; drop it so the next call starts fresh.
            self.tokens.invalidate().await;
        }

        read_json(response).await
    }
}
