//! Channel login name to broadcaster id resolution.
//!
//! Resolution goes through GET /helix/users on every call unless a TTL is
//! configured, in which case successful lookups are remembered for that long.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::api::TwitchApiClient;
use crate::auth::TokenCache;
use crate::clock::Clock;
use crate::TwitchError;

#[derive(Debug, Clone)]
struct CachedChannel {
    id: String,
    expires_at: DateTime<Utc>,
}

/// Resolves channel login names to stable broadcaster ids.
pub struct ChannelResolver {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    /// Login -> resolved id.
    entries: RwLock<HashMap<String, CachedChannel>>,
}

impl ChannelResolver {
    /// A zero (or negative) `ttl` disables caching.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn caching(&self) -> bool {
        self.ttl > Duration::zero()
    }

    /// Resolve `name` to its broadcaster id.
    pub async fn resolve_channel_id(
        &self,
        api: &TwitchApiClient,
        tokens: &TokenCache,
        name: &str,
    ) -> Result<String, TwitchError> {
        let login = normalize_login(name);
        if login.is_empty() {
            return Err(TwitchError::ChannelNotFound(name.to_string()));
        }

        if self.caching() {
            let now = self.clock.now();
            if let Some(hit) = self.entries.read().await.get(&login) {
                if now < hit.expires_at {
                    return Ok(hit.id.clone());
                }
            }
        }

        let token = tokens.get_token().await?;
        let user = match api.get_user_by_login(&token, &login).await {
            Ok(user) => user,
            Err(err) => {
                tokens.discard_if_rejected(&token, &err).await;
                return Err(err);
            }
        };
        tracing::debug!(login = %login, id = %user.id, "Resolved channel");

        if self.caching() {
            let now = self.clock.now();
            let mut entries = self.entries.write().await;
            entries.retain(|_, entry| now < entry.expires_at);
            // A TTL reaching past the representable range is simply not cached.
            if let Some(expires_at) = now.checked_add_signed(self.ttl) {
                entries.insert(
                    login,
                    CachedChannel {
                        id: user.id.clone(),
                        expires_at,
                    },
                );
            }
        }

        Ok(user.id)
    }

    /// Number of remembered channels. Expired entries are pruned on the next insert.
    pub async fn cached_len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Twitch logins are lowercase; accept display-name casing and stray whitespace.
fn normalize_login(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
