// Doctor Directory - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use doctor_directory::{logging, router, AppState, DirectoryConfig, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DirectoryConfig::from_env();
    logging::init_tracing(&config.logging.level)?;

    tracing::info!(version = VERSION, "Doctor Directory - Web Server");

    let state = AppState::from_config(&config).context("Failed to seed directory")?;
    tracing::info!(
        doctors = state.providers.len(),
        signup_policy = ?state.accounts.policy(),
        "Application state ready"
    );

    let app = router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("API: http://{}/api/doctors", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Keep serving; the process can still be killed
        std::future::pending::<()>().await;
    }
}
