use bookstall_server::api;
use bookstall_server::core::{Config, ServerState};
use bookstall_server::utils::logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing (stdout, plus daily file when LOG_DIR is set)
    logger::init_logger(config.log_dir.as_deref());

    tracing::info!("Starting bookstall-server (env: {})", config.environment);

    // Initialize application state (opens the database, runs migrations)
    let state = ServerState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bookstall-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
