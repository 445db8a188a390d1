//! Headless clip server.
//!
//! Loads configuration, builds the clip pipeline, and serves the widget API
//! until Ctrl+C.

use tracing_subscriber::EnvFilter;

use clip_player_lib::app::SharedState;
use clip_player_lib::config::AppConfig;
use clip_player_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting clip player server");

    clip_player_lib::load_dotenv();
    let config = AppConfig::load()?;
    let clips = clip_player_lib::build_clip_service(&config)?;
    let state = SharedState::new(config, clips);

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Clip server running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    state.shutdown_token().cancel();
    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
