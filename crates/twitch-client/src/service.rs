//! Single entry point: "playable clips for {channel, start, end}".
//!
//! Resolves the channel when given a login name, fetches the first page of
//! clips with the cached app token, then shuffles and filters them.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::api::{Clip, ClipBatch, DateWindow, TwitchApiClient};
use crate::auth::TokenCache;
use crate::clock::Clock;
use crate::curator::ClipCurator;
use crate::resolver::ChannelResolver;
use crate::TwitchError;

/// How the caller identified the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Stable broadcaster id, used as-is.
    Id(String),
    /// Login name, resolved through the users endpoint.
    Name(String),
}

pub struct ClipService {
    tokens: Arc<TokenCache>,
    api: TwitchApiClient,
    resolver: ChannelResolver,
    curator: ClipCurator,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl ClipService {
    pub fn new(tokens: Arc<TokenCache>, api: TwitchApiClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens,
            api,
            resolver: ChannelResolver::new(Duration::zero(), clock.clone()),
            curator: ClipCurator::default(),
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_curator(mut self, curator: ClipCurator) -> Self {
        self.curator = curator;
        self
    }

    /// Remember resolved channel ids for `ttl`. Zero disables caching.
    pub fn with_channel_cache_ttl(mut self, ttl: Duration) -> Self {
        self.resolver = ChannelResolver::new(ttl, self.clock.clone());
        self
    }

    /// Replace the shuffle source, e.g. with a seeded generator.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn resolver(&self) -> &ChannelResolver {
        &self.resolver
    }

    /// Resolve a login name to a broadcaster id.
    pub async fn resolve_channel_id(&self, name: &str) -> Result<String, TwitchError> {
        self.resolver
            .resolve_channel_id(&self.api, &self.tokens, name)
            .await
    }

    /// Fetch the first page of clips for a broadcaster id, unmodified.
    pub async fn fetch_clips(
        &self,
        broadcaster_id: &str,
        window: &DateWindow,
    ) -> Result<ClipBatch, TwitchError> {
        let token = self.tokens.get_token().await?;
        match self.api.get_clips(&token, broadcaster_id, window).await {
            Ok(batch) => Ok(batch),
            Err(err) => {
                self.tokens.discard_if_rejected(&token, &err).await;
                Err(err)
            }
        }
    }

    /// Shuffled clips for the channel that are old enough to play.
    pub async fn get_clips(
        &self,
        channel: &ChannelRef,
        window: &DateWindow,
    ) -> Result<Vec<Clip>, TwitchError> {
        let broadcaster_id = match channel {
            ChannelRef::Id(id) => id.clone(),
            ChannelRef::Name(name) => self.resolve_channel_id(name).await?,
        };

        let batch = self.fetch_clips(&broadcaster_id, window).await?;
        let now = self.clock.now();
        let clips = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.curator.curate(batch.clips, now, &mut *rng)
        };

        tracing::info!(
            broadcaster_id = %broadcaster_id,
            count = clips.len(),
            "Serving curated clips"
        );
        Ok(clips)
    }
}
