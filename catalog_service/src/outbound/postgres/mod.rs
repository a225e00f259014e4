//! PostgreSQL implementation of the storage ports.
//! Every function takes an explicit pool or connection; multi row writes run in
//! a transaction that rolls back when dropped before commit.

mod collections;
mod products;
mod users;


use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{
        Collection, CollectionDetail, MembershipChange, Product, ProductCategory, ProductDraft,
        ProductRecord, User,
    },
    ports::{CollectionRepo, ProductRepo, UserRepo},
};

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Storage(err.into())
    }
}

/// PostgreSQL storage of the whole catalog
#[derive(Debug, Clone)]
pub struct PgCatalogRepo {
    pool: PgPool,
}

impl PgCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProductRepo for PgCatalogRepo {
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        products::create_product(&self.pool, draft).await
    }

    async fn get_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        products::get_product(&self.pool, category, id).await
    }

    async fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> Result<Option<Product>, CatalogError> {
        products::update_product(&self.pool, id, draft).await
    }

    async fn delete_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<bool, CatalogError> {
        products::delete_product(&self.pool, category, id).await
    }

    async fn list_products(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        products::list_products(&self.pool, category).await
    }
}

impl CollectionRepo for PgCatalogRepo {
    async fn create_collection(
        &self,
        owner_id: &str,
        name: Option<String>,
    ) -> Result<Collection, CatalogError> {
        collections::create_collection(&self.pool, owner_id, name).await
    }

    async fn list_collections(&self, owner_id: &str) -> Result<Vec<Collection>, CatalogError> {
        collections::list_collections(&self.pool, owner_id).await
    }

    async fn get_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        include_products: bool,
    ) -> Result<Option<CollectionDetail>, CatalogError> {
        collections::get_collection(&self.pool, owner_id, collection_id, include_products).await
    }

    async fn delete_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
    ) -> Result<bool, CatalogError> {
        collections::delete_collection(&self.pool, owner_id, collection_id).await
    }

    async fn add_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<MembershipChange, CatalogError> {
        collections::add_member(&self.pool, owner_id, collection_id, product_id).await
    }

    async fn remove_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<MembershipChange, CatalogError> {
        collections::remove_member(&self.pool, owner_id, collection_id, product_id).await
    }
}

impl UserRepo for PgCatalogRepo {
    async fn upsert_user(&self, id: &str, name: Option<String>) -> Result<User, CatalogError> {
        users::upsert_user(&self.pool, id, name).await
    }
}
