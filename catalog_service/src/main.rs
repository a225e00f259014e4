use crate::api::context::ApiContext;
use anyhow::Context;
use catalog_db_migrator::CATALOG_DB_MIGRATIONS;
use catalog_entrypoint::CatalogEntrypoint;
use catalog_service::{
    domain::services::CatalogServiceImpl,
    outbound::{JwtIdentityResolver, PgCatalogRepo},
};
use config::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

mod api;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    CatalogEntrypoint::default().init();

    let config = Config::from_env().context("expected to be able to generate config")?;

    tracing::info!(environment = %config.environment, "initialized config");

    let (min_connections, max_connections) = config.pool_size();

    let db = PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .connect(&config.database_url)
        .await
        .context("could not connect to catalog db")?;

    tracing::info!(
        min_connections,
        max_connections,
        "initialized catalog db connection"
    );

    CATALOG_DB_MIGRATIONS
        .run(&db)
        .await
        .context("failed to run catalog db migrations")?;

    tracing::info!("catalog db schema is up to date");

    let resolver = JwtIdentityResolver::new(config.identity.clone())
        .context("could not build the jwt identity resolver")?;

    tracing::info!(issuer = %config.identity.issuer, "initialized identity resolver");

    let repo = PgCatalogRepo::new(db);
    let service = CatalogServiceImpl::new(repo.clone(), repo.clone(), repo);

    api::setup_and_serve(ApiContext {
        config: Arc::new(config),
        service: Arc::new(service),
        resolver: Arc::new(resolver),
    })
    .await
}
