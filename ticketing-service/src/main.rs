use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketing_service::config::ServiceConfig;
use ticketing_service::store::MongoStore;
use ticketing_service::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    info!(?config, "configuration loaded");

    let store = MongoStore::connect(&config.mongodb_uri, &config.database_name)
        .await
        .context("failed to create MongoDB client")?;
    let state = AppState::new(Arc::new(store), config.jwt_config());
    let app = build_router(state, config.cors_layer()?);

    let addr = config.socket_addr();
    info!(%addr, "starting ticketing-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
