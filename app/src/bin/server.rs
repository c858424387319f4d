//! Redirect server binary.
//!
//! Serves `GET /` as a liveness check and `GET /<short path>` as a 302 to the
//! target currently stored in the redirect document.

use tokio_util::sync::CancellationToken;

use qr_redirect_lib::config::AppConfig;
use qr_redirect_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qr_redirect_lib::init_tracing();
    qr_redirect_lib::load_dotenv();

    let config = AppConfig::from_env();
    tracing::info!(port = config.port, "Starting redirect server");

    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let mut server_handle =
        tokio::spawn(async move { server::start_server(&config, server_shutdown).await });

    tokio::select! {
        // Exits on its own only when binding or serving fails.
        res = &mut server_handle => res??,
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutting down...");
            shutdown.cancel();
            server_handle.await??;
        }
    }
    Ok(())
}
