//! Weather backend proxy
//!
//! Main entry point for the HTTP server.

use anyhow::{Context, anyhow};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, config::OPENWEATHER};
use weather_server::{AppState, OpenWeatherClient, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let api_key = std::env::var("OPENWEATHER_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.provider_api_key(OPENWEATHER).map(str::to_owned))
        .ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
            )
        })?;

    let upstream_url = config.server.upstream_url();
    let app = router(
        AppState::new(OpenWeatherClient::new(api_key, upstream_url)),
        config.server.site_dir.as_deref(),
    );

    let bind = config.server.bind();
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    info!(
        addr = %listener.local_addr()?,
        upstream = upstream_url,
        site_dir = ?config.server.site_dir,
        "weather-server v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
