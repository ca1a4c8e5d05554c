use room_relay::{create_router, AppError, AppState, RelayConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "room_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = RelayConfig::from_env()?;

    info!(
        port = config.port,
        allowed_origin = %config.allowed_origin,
        rejoin_policy = ?config.rejoin_policy,
        "Starting room relay server"
    );

    // One registry for the whole process, handed to every connection through state
    let app_state = AppState::in_memory(config.rejoin_policy);
    let app = create_router(app_state, &config)?;

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(address = %address, "HTTP/WebSocket server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
