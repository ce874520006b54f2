use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use porsa_backend::core::config::{AppConfig, AppPaths};
use porsa_backend::core::logging;
use porsa_backend::server::router;
use porsa_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    logging::init(&paths.log_dir);

    let config = AppConfig::load(&paths)?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::initialize(paths, config).await?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = router::router(state);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
