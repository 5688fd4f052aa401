use dotenvy::dotenv;
use lms_config::ServerConfig;
use lms_portal::logging::init_tracing;
use lms_portal::router::init_router;
use lms_portal::state::init_app_state;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.log_dir)?;

    let state = init_app_state().await?;
    info!(environment = state.environment.as_str(), "Starting LMS portal");

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{address}");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
