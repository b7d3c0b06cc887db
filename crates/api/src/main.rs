use anyhow::Context;

use shoplist_api::app::{build_app, services};
use shoplist_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shoplist_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let services = services::build_services(&config.store).await?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
