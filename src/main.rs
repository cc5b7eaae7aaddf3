//! Payment alerts server binary.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use payment_alerts::adapters::{
    alert_router, AlertAppState, EnvSecretStore, HttpPlatformClient, TelegramAlertSender,
};
use payment_alerts::application::AlertServices;
use payment_alerts::config::AppConfig;
use payment_alerts::ports::{AlertSender, SecretStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    // Logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.server.environment.json_logs() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate()?;

    // ---- Adapters ----
    let secrets: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new());
    let sender: Arc<dyn AlertSender> =
        Arc::new(TelegramAlertSender::new(&config.telegram, secrets)?);

    let platform = Arc::new(HttpPlatformClient::new(&config.platform)?);
    if !platform.is_configured() {
        tracing::warn!("Platform API not configured; buyer lookups and order fetches are disabled");
    }

    // ---- Application ----
    let services = AlertServices::new(
        platform.clone(),
        platform,
        sender.clone(),
        config.policy.clone(),
    );

    let app = alert_router()
        .with_state(AlertAppState::new(services, sender))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, site = %config.policy.site_label, "Payment alerts listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, shutting down");
            }
        })
        .await?;

    Ok(())
}
