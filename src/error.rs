//! Errors raised while talking to the Helix and SpeedRunsLive APIs.

use thiserror::Error;

/// Failures of a single API call.
///
/// Transport, status and decode errors all end the fetch that raised them;
/// callers that walk several pages keep what they gathered before the
/// failure (see [`crate::paginate::PageWalk`]).
#[derive(Error, Debug)]
pub enum ApiError {
    /// DNS, connect, TLS or timeout failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status. Carries the status text.
    #[error("{status} from {url}")]
    Status { status: String, url: String },

    #[error("error decoding json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token request failed: {0}")]
    Auth(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
