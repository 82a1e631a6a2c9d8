//! Bazaar API server entry point
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bazaar_api::auth::InMemoryTokenRegistry;
use bazaar_api::db::{create_pool, init_schema};
use bazaar_api::state::AppState;

use bazaar_core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bazaar_api={0},tower_http={0}", config.logging.level)));
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    init_schema(&pool)
        .await
        .context("failed to initialize database schema")?;
    tracing::info!(url = %config.database.url, "database ready");

    let registry = Arc::new(InMemoryTokenRegistry::new());
    let state = Arc::new(AppState::new(&config, pool, registry));
    let app = bazaar_api::create_router(&config.server, state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on http://{addr}");
    tracing::info!("swagger ui at http://{addr}/swagger-ui");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
