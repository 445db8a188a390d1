//! Twitch integration client library.
//!
//! Provides the app access token cache, a Helix REST client for user
//! lookup and clip listing, and the clip curation pipeline used by the
//! clip player widget.

pub mod api;
pub mod auth;
pub mod clock;
pub mod curator;
pub mod resolver;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use api::{Clip, ClipBatch, DateWindow, TwitchApiClient};
pub use auth::{TokenCache, TwitchAuth};
pub use clock::{Clock, FixedClock, SystemClock};
pub use curator::ClipCurator;
pub use resolver::ChannelResolver;
pub use service::{ChannelRef, ClipService};

/// App access token obtained through the client-credentials flow.
///
/// Always replaced as a whole; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// A token is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error fetching access token: {0}")]
    UpstreamAuth(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid date window: start must not be after end")]
    InvalidWindow,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl TwitchError {
    /// Whether the upstream rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TwitchError::ApiError { status: 401, .. })
    }
}
