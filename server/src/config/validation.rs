//! Setting value validation.

use url::Url;

use super::AppConfig;

/// Validate a single setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CLIENT_ID" | "CLIENT_SECRET" => {
            if value.trim().is_empty() {
                return Err("is required".into());
            }
        }
        "REQUEST_TIMEOUT_SECS" => validate_int_range(value, 1, 300)?,
        "MIN_CLIP_AGE_DAYS" => validate_int_range(value, 0, 3650)?,
        "CHANNEL_CACHE_TTL_SECS" => validate_int_range(value, 0, 86_400)?,
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "TWITCH_AUTH_URL" | "TWITCH_HELIX_URL" => {
            let url = Url::parse(value).map_err(|_| "must be an absolute URL")?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err("must be an http(s) URL".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate a whole config, returning one `KEY: problem` entry per failure.
pub fn validate_config(config: &AppConfig) -> Vec<String> {
    let settings = [
        ("CLIENT_ID", config.client_id.clone()),
        ("CLIENT_SECRET", config.client_secret.clone()),
        ("SERVER_PORT", config.server_port.to_string()),
        ("REQUEST_TIMEOUT_SECS", config.request_timeout_secs.to_string()),
        ("MIN_CLIP_AGE_DAYS", config.min_clip_age_days.to_string()),
        ("CHANNEL_CACHE_TTL_SECS", config.channel_cache_ttl_secs.to_string()),
        ("TWITCH_AUTH_URL", config.auth_url.clone()),
        ("TWITCH_HELIX_URL", config.helix_url.clone()),
    ];

    settings
        .iter()
        .filter_map(|(key, value)| {
            validate_setting(key, value)
                .err()
                .map(|problem| format!("{key}: {problem}"))
        })
        .collect()
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
