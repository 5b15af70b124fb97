use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) mod analysis;
pub(crate) mod assistant;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod models;
mod router;
mod routes;
pub(crate) mod session;
pub(crate) mod table;
mod templates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::AppConfig::from_env()?;
    let addr = config.bind_addr;
    let router = router::init_router(config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Smart Exam Coach listening on http://{}", addr);
    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
