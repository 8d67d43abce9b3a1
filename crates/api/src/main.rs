use anyhow::Context;

use warden_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let addr = config.server_addr;

    let app = warden_api::app::build_app(&config)
        .await
        .context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, issuer = %config.issuer, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
