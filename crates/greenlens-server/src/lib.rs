//! HTTP API: health check plus text, PDF and image classification endpoints.

mod config;
pub use config::{ModelArgs, OcrArgs, ServerConfig};

mod error;
pub use error::ApiError;

mod routes;
pub use routes::router;

mod state;
pub use state::AppState;

use tracing::info;

/// Bind `config.host:config.port` and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
