pub mod handlers;
pub mod router;


use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::app::SharedState;
use crate::config::AppConfig;

/// Bind to the configured address and serve until `shutdown` is cancelled.
pub async fn start_server(config: &AppConfig, shutdown: CancellationToken) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Redirect server listening on http://{}", addr);
    tracing::info!(
        path = %config.redirect_path,
        file = %config.redirect_file.display(),
        "Redirect target is read per request"
    );
    serve(listener, SharedState::new(config), shutdown).await
}

/// Serve the router on an already-bound listener.
pub async fn serve(listener: TcpListener, state: SharedState, shutdown: CancellationToken) -> Result<()> {
    let app = router::create_router(state);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
