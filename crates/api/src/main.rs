use anyhow::{Context, Result};
use api::{build_state, config::CONFIG_FILE, router, AppConfig};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::load(Path::new(CONFIG_FILE))?;
    let state = Arc::new(build_state(&config)?);

    tracing::info!(
        endpoint = %config.llm.endpoint,
        model = %config.llm.model,
        store = ?config.store.path,
        "Transaction extractor configured"
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!("Server listening on http://{}", config.server.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
