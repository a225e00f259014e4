use catalog_service::{
    domain::services::CatalogServiceImpl,
    outbound::{JwtIdentityResolver, PgCatalogRepo},
};
use std::sync::Arc;

use crate::config::Config;

pub type CatalogServiceType = CatalogServiceImpl<PgCatalogRepo, PgCatalogRepo, PgCatalogRepo>;

#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
    /// Shared between the routes and the auth middleware
    pub service: Arc<CatalogServiceType>,
    pub resolver: Arc<JwtIdentityResolver>,
}
