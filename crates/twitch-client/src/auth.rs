//! App access token management for Twitch.
//!
//! Handles the client-credentials exchange and keeps the current token in a
//! single shared slot, refreshing it once it has expired.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::{Token, TwitchError};

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    expires_in: i64,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Performs the client-credentials exchange against the Twitch identity provider.
pub struct TwitchAuth {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_http(client_id, client_secret, reqwest::Client::new())
    }

    /// Create an auth manager sharing an existing HTTP client (timeouts, pool).
    pub fn with_http(client_id: String, client_secret: String, http: reqwest::Client) -> Self {
        Self {
            client_id,
            client_secret,
            token_url: TOKEN_URL.to_string(),
            http,
        }
    }

    /// Point the exchange at a different token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Exchange client id and secret for an app access token.
    ///
    /// `issued_at` is the instant the lifetime reported by Twitch is counted from.
    pub async fn exchange_app_token(&self, issued_at: DateTime<Utc>) -> Result<Token, TwitchError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| TwitchError::UpstreamAuth(format!("request failed: {e}")))?;

        parse_token_response(resp, issued_at).await
    }
}

/// Parse the token endpoint response into a `Token`.
async fn parse_token_response(
    resp: reqwest::Response,
    issued_at: DateTime<Utc>,
) -> Result<Token, TwitchError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| TwitchError::UpstreamAuth(format!("failed to read response: {e}")))?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or(body);
        tracing::warn!(status = status.as_u16(), "Token exchange rejected");
        return Err(TwitchError::UpstreamAuth(format!("{status} - {detail}")));
    }

    let token_resp: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| TwitchError::UpstreamAuth(format!("failed to parse response: {e}")))?;

    if token_resp.access_token.is_empty() {
        return Err(TwitchError::UpstreamAuth(
            "response did not contain an access token".into(),
        ));
    }

    let expires_at = Duration::try_seconds(token_resp.expires_in)
        .filter(|lifetime| *lifetime > Duration::zero())
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .ok_or_else(|| {
            TwitchError::UpstreamAuth(format!("invalid expires_in: {}", token_resp.expires_in))
        })?;

    Ok(Token {
        access_token: token_resp.access_token,
        expires_at,
    })
}

/// Single shared slot holding the current app access token.
///
/// Concurrent callers that find the slot empty or expired may each perform
/// an exchange; the last one to finish wins. The slot is only written after
/// a successful exchange.
pub struct TokenCache {
    auth: TwitchAuth,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<Token>>,
}

impl TokenCache {
    pub fn new(auth: TwitchAuth, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth,
            clock,
            slot: RwLock::new(None),
        }
    }

    /// Return the cached token, exchanging for a new one when absent or expired.
    pub async fn get_token(&self) -> Result<Token, TwitchError> {
        let now = self.clock.now();

        if let Some(token) = self.slot.read().await.as_ref() {
            if token.is_valid_at(now) {
                return Ok(token.clone());
            }
            tracing::debug!(expired_at = %token.expires_at, "Cached app token expired");
        }

        let token = self.auth.exchange_app_token(now).await?;
        tracing::info!(expires_at = %token.expires_at, "Obtained new app access token");

        *self.slot.write().await = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token if it is still the one the caller used.
    ///
    /// Called after the upstream rejects a token so the next request exchanges
    /// again. A token installed by a concurrent refresh is left alone.
    pub async fn invalidate(&self, rejected: &Token) {
        let mut slot = self.slot.write().await;
        if slot.as_ref() == Some(rejected) {
            tracing::warn!("Discarding app access token rejected by Twitch");
            *slot = None;
        }
    }

    /// Invalidate `token` when `err` says Twitch rejected it.
    pub async fn discard_if_rejected(&self, token: &Token, err: &TwitchError) {
        if err.is_unauthorized() {
            self.invalidate(token).await;
        }
    }

    /// Snapshot of the cached token, valid or not.
    pub async fn cached(&self) -> Option<Token> {
        self.slot.read().await.clone()
    }

    /// Whether a token usable right now is cached.
    pub async fn has_valid_token(&self) -> bool {
        let now = self.clock.now();
        self.slot
            .read()
            .await
            .as_ref()
            .is_some_and(|token| token.is_valid_at(now))
    }

    #[cfg(test)]
    pub(crate) async fn install(&self, token: Token) {
        *self.slot.write().await = Some(token);
    }
}
