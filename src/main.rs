// ABOUTME: Entry point for the mlrund binary.
// ABOUTME: Loads environment configuration, initializes tracing, and starts the HTTP server.

use std::sync::Arc;

use mlrund_core::MlrunConfig;
use mlrund_server::{AppState, IguazioClient, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mlrund=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let config = MlrunConfig::from_env()?;
    let identity = Arc::new(IguazioClient::new(config.iguazio_api_url.clone())?);

    tracing::info!(bind = %config.bind, "mlrund starting up");

    let bind = config.bind;
    let state = Arc::new(AppState::new(config, identity));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
