pub mod app;
pub mod config;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use twitch_client::{
    ClipCurator, ClipService, SystemClock, TokenCache, TwitchApiClient, TwitchAuth,
};

use config::AppConfig;

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Build the clip pipeline from configuration.
///
/// One HTTP client (carrying the request timeout) is shared by the token
/// exchange and every Helix call.
pub fn build_clip_service(config: &AppConfig) -> Result<ClipService, anyhow::Error> {
    let problems = config::validation::validate_config(config);
    if !problems.is_empty() {
        anyhow::bail!("invalid configuration: {}", problems.join("; "));
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let clock = Arc::new(SystemClock);
    let auth = TwitchAuth::with_http(
        config.client_id.clone(),
        config.client_secret.clone(),
        http.clone(),
    )
    .with_token_url(config.auth_url.clone());
    let tokens = Arc::new(TokenCache::new(auth, clock.clone()));
    let api = TwitchApiClient::with_http(config.client_id.clone(), http)
        .with_base_url(config.helix_url.clone());

    let min_age = chrono::Duration::try_days(config.min_clip_age_days)
        .ok_or_else(|| anyhow::anyhow!("MIN_CLIP_AGE_DAYS is out of range"))?;
    let channel_ttl = i64::try_from(config.channel_cache_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| anyhow::anyhow!("CHANNEL_CACHE_TTL_SECS is out of range"))?;

    Ok(ClipService::new(tokens, api, clock)
        .with_curator(ClipCurator::new(min_age))
        .with_channel_cache_ttl(channel_ttl))
}
