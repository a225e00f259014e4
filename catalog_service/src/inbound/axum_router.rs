use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::domain::ports::CatalogService;

pub mod auth;
pub mod collections;
pub mod error;
pub mod products;
pub mod users;

#[cfg(test)]
mod tests;

pub use auth::{AuthState, authenticate};
pub use error::{CatalogHttpError, ErrorResponse};
pub use products::{Books, CategoryResource, FilmSeriesResource, Games, Mangas};

pub struct CatalogRouterState<T> {
    service: Arc<T>,
}

impl<T> Clone for CatalogRouterState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T> CatalogRouterState<T>
where
    T: CatalogService,
{
    pub fn new(service: T) -> Self {
        Self::from_arc(Arc::new(service))
    }

    /// share a service that other routers or middleware also hold
    pub fn from_arc(service: Arc<T>) -> Self {
        CatalogRouterState { service }
    }
}

/// All catalog routes. Handlers expect the caller's [crate::domain::models::User]
/// as a request extension, see [authenticate].
pub fn catalog_router<T, S>(state: CatalogRouterState<T>) -> Router<S>
where
    T: CatalogService,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/sync-user", get(users::sync_user))
        .merge(products::books::routes::<T>())
        .merge(products::mangas::routes::<T>())
        .merge(products::games::routes::<T>())
        .merge(products::film_series::routes::<T>())
        .route(
            "/sammlungen",
            post(collections::create_collection::<T>).get(collections::list_collections::<T>),
        )
        .route(
            "/sammlungen/:id",
            get(collections::get_collection::<T>).delete(collections::delete_collection::<T>),
        )
        .route(
            "/sammlung/:sammlung_id/produkte",
            post(collections::add_member::<T>),
        )
        .route(
            "/sammlung/:sammlung_id/produkte/:produkt_id",
            delete(collections::remove_member::<T>),
        )
        .with_state(state)
}
