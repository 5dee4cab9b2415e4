use anyhow::Result;
use pachca_ingress::{AppState, IngressConfig, router};
use pachca_telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let telemetry = TelemetryConfig::from_env("pachca-ingress", env!("CARGO_PKG_VERSION"));
    init_telemetry(telemetry)?;

    let config = IngressConfig::from_env()?;
    if config.secret.is_none() {
        tracing::warn!("PACHCA_WEBHOOK_SECRET unset; accepting unsigned webhooks");
    }
    tracing::info!(
        max_size = config.webhook.max_size,
        max_age = ?config.webhook.max_age,
        "webhook limits"
    );

    let addr = config.bind;
    let app = router(AppState::from_config(&config));

    tracing::info!("ingress-pachca listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
