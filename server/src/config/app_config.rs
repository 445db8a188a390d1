//! Runtime application configuration loaded from file + environment overrides.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::validation::validate_config;

pub const DEFAULT_CONFIG_PATH: &str = "config/twitchconfig.json";
pub const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Channel served when a request names none.
    pub broadcaster_id: Option<String>,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    pub min_clip_age_days: i64,
    pub channel_cache_ttl_secs: u64,
    pub auth_url: String,
    pub helix_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            broadcaster_id: None,
            server_port: 5252,
            request_timeout_secs: 10,
            min_clip_age_days: twitch_client::curator::DEFAULT_MIN_CLIP_AGE_DAYS,
            channel_cache_ttl_secs: 0,
            auth_url: DEFAULT_AUTH_URL.into(),
            helix_url: DEFAULT_HELIX_URL.into(),
        }
    }
}

/// Shape of `config/twitchconfig.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub broadcaster_id: Option<String>,
    pub server_port: Option<u16>,
}

impl FileConfig {
    /// Read the JSON config file. A missing file yields an empty config.
    pub fn read(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            tracing::info!("No config file at {}, using environment only", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::info!("Loaded config file {}", path.display());
        Ok(file)
    }
}

impl AppConfig {
    /// Load configuration from the JSON file and process environment.
    pub fn load() -> Result<Self, anyhow::Error> {
        let path = std::env::var("TWITCH_CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::read(Path::new(&path))?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge defaults, file values and environment values (highest precedence).
    pub fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let defaults = Self::default();
        let g = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            client_id: g("CLIENT_ID").or(file.client_id).unwrap_or_default(),
            client_secret: g("CLIENT_SECRET").or(file.client_secret).unwrap_or_default(),
            broadcaster_id: g("BROADCASTER_ID")
                .or(file.broadcaster_id)
                .filter(|id| !id.trim().is_empty()),
            server_port: parse_or(g("SERVER_PORT"), "SERVER_PORT")?
                .or(file.server_port)
                .unwrap_or(defaults.server_port),
            request_timeout_secs: parse_or(g("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            min_clip_age_days: parse_or(g("MIN_CLIP_AGE_DAYS"), "MIN_CLIP_AGE_DAYS")?
                .unwrap_or(defaults.min_clip_age_days),
            channel_cache_ttl_secs: parse_or(g("CHANNEL_CACHE_TTL_SECS"), "CHANNEL_CACHE_TTL_SECS")?
                .unwrap_or(defaults.channel_cache_ttl_secs),
            auth_url: g("TWITCH_AUTH_URL").unwrap_or(defaults.auth_url),
            helix_url: g("TWITCH_HELIX_URL").unwrap_or(defaults.helix_url),
        };

        let problems = validate_config(&config);
        if !problems.is_empty() {
            anyhow::bail!("invalid configuration: {}", problems.join("; "));
        }
        Ok(config)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
) -> Result<Option<T>, anyhow::Error> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| anyhow::anyhow!("{key}: '{v}' is not a valid number"))
        })
        .transpose()
}
