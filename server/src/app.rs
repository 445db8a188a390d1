use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use twitch_client::ClipService;

use crate::config::AppConfig;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    /// Clip pipeline; owns the shared app token slot.
    clips: ClipService,
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(config: AppConfig, clips: ClipService) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                clips,
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn clips(&self) -> &ClipService {
        &self.inner.clips
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
