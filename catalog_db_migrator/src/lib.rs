//! The sole responsibility of this crate is to expose the statically imported sql migrations for the catalog db.
//!
//! The migrations live outside of catalog_service so that tests and tooling can run them without pulling in the service.
pub static CATALOG_DB_MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
