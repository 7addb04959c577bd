//! Catalog API - categories, products and stock over REST

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{self as pg, DatabaseConnection};
use domain_catalog::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreKind};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    match config.store {
        StoreKind::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            serve(config, InMemoryCatalogStore::new(), None).await
        }
        StoreKind::Postgres => {
            let pg_config = config
                .postgres
                .clone()
                .ok_or_else(|| eyre::eyre!("DATABASE_URL is required when CATALOG_STORE=postgres"))?;

            info!("Connecting to PostgreSQL");
            let db = pg::connect_from_config_with_retry(pg_config, None).await?;
            pg::run_migrations::<Migrator>(&db, config.app.name).await?;

            serve(config, PgCatalogStore::new(db.clone()), Some(db)).await
        }
    }
}

async fn serve<S: CatalogStore + 'static>(
    config: Config,
    store: S,
    db: Option<DatabaseConnection>,
) -> eyre::Result<()> {
    let Config {
        app: app_info,
        server: server_config,
        ..
    } = config;
    let state = AppState { db };

    let router = create_router::<openapi::ApiDoc>(api::routes(store), &server_config)?
        .merge(health_router(app_info))
        .merge(api::health::ready_router(state.clone()));

    info!(
        "Starting {} v{} on port {}",
        app_info.name, app_info.version, server_config.port
    );

    create_production_app(router, &server_config, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = db.close().await {
                warn!("Failed to close PostgreSQL pool: {}", e);
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
