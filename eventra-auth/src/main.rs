use std::net::SocketAddr;
use std::sync::Arc;

use eventra_auth::{
    build_router,
    config::Config,
    services::{InMemoryRevocationList, InMemoryUserStore, PgUserStore, UserStore},
    AppState,
};
use eventra_core::observability::logging::init_tracing;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), eventra_core::error::AppError> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = Config::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        "Starting authentication service"
    );

    let store: Arc<dyn UserStore> = match &config.database.url {
        Some(url) => {
            let store = PgUserStore::connect(url).await?;
            store.initialize_schema().await?;
            tracing::info!("Database initialized successfully");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let revocation_list = Arc::new(InMemoryRevocationList::new());

    let state = AppState::new(config.clone(), store, revocation_list);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| eventra_core::error::AppError::InternalError(e.into()))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| eventra_core::error::AppError::InternalError(e.into()))?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
