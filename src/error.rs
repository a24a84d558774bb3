//! Error types for Playlens

use thiserror::Error;

/// Failures from the Steam Web API gateway.
///
/// Identity and ownership lookups propagate these to the aggregation
/// caller and abort the whole profile computation. Achievement lookups
/// never surface them: absence of achievement data is `None` at the
/// gateway boundary, not an error.
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("Gateway configuration error: {0}")]
    Config(String),
}

impl RemoteServiceError {
    /// The request URL the failure occurred on, when one exists.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                Some(url)
            }
            Self::Config(_) => None,
        }
    }
}
