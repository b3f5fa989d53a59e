use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use velocity::server::{create_router, AppState, JwtAuth, MemoryStore, ServerConfig, UserStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let store: Arc<dyn UserStore> = match &config.data_path {
        Some(path) => match MemoryStore::with_snapshot(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load user store");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("VELOCITY_DATA not set, scores will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let auth = JwtAuth::new(config.jwt_secret.as_bytes(), config.token_ttl, config.bcrypt_cost);
    let app = create_router(AppState::new(store, auth));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "velocity server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server stopped with an error");
    }
    tracing::info!("stopping server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C handler");
    }
}
