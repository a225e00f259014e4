//! Ports - the interfaces the catalog domain depends on and exposes

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{
        Collection, CollectionDetail, DeleteOutcome, Identity, MembershipChange, Product,
        ProductCategory, ProductDraft, ProductRecord, User,
    },
};

/// Storage of products and their category details.
/// Every write covering both rows happens inside one transaction.
#[cfg_attr(test, mockall::automock)]
pub trait ProductRepo: Send + Sync + 'static {
    /// Insert the base record and the detail record of the draft's category
    fn create_product(
        &self,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch a product by id and category joined with its details
    fn get_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<ProductRecord>, CatalogError>> + Send;

    /// Overwrite both records. Returns [None] when no product of the draft's category has that id.
    /// A missing detail row is an [CatalogError::Integrity] and rolls back the base update.
    fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send;

    /// Delete by id and category, returns whether a row matched
    fn delete_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> impl Future<Output = Result<bool, CatalogError>> + Send;

    /// All products of a category joined with their details
    fn list_products(
        &self,
        category: ProductCategory,
    ) -> impl Future<Output = Result<Vec<ProductRecord>, CatalogError>> + Send;
}

/// Storage of collections and their memberships.
/// Every operation is scoped to the owner, foreign collections behave as absent.
#[cfg_attr(test, mockall::automock)]
pub trait CollectionRepo: Send + Sync + 'static {
    fn create_collection(
        &self,
        owner_id: &str,
        name: Option<String>,
    ) -> impl Future<Output = Result<Collection, CatalogError>> + Send;

    /// The owner's collections ordered by name, unnamed ones last
    fn list_collections(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<Collection>, CatalogError>> + Send;

    fn get_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        include_products: bool,
    ) -> impl Future<Output = Result<Option<CollectionDetail>, CatalogError>> + Send;

    fn delete_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
    ) -> impl Future<Output = Result<bool, CatalogError>> + Send;

    /// Checks ownership and product existence, then inserts the pair, in one transaction
    fn add_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> impl Future<Output = Result<MembershipChange, CatalogError>> + Send;

    /// Checks ownership, then removes the pair if present, in one transaction
    fn remove_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> impl Future<Output = Result<MembershipChange, CatalogError>> + Send;
}

/// Storage of locally known users
#[cfg_attr(test, mockall::automock)]
pub trait UserRepo: Send + Sync + 'static {
    /// Create the user or overwrite its name, in a single statement
    fn upsert_user(
        &self,
        id: &str,
        name: Option<String>,
    ) -> impl Future<Output = Result<User, CatalogError>> + Send;
}

/// The operations exposed to the inbound adapters
pub trait CatalogService: Send + Sync + 'static {
    fn create_product(
        &self,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn get_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn delete_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> impl Future<Output = Result<DeleteOutcome, CatalogError>> + Send;

    fn list_products(
        &self,
        category: ProductCategory,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    fn create_collection(
        &self,
        owner_id: &str,
        name: Option<String>,
    ) -> impl Future<Output = Result<Collection, CatalogError>> + Send;

    fn list_collections(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<Collection>, CatalogError>> + Send;

    fn get_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        include_products: bool,
    ) -> impl Future<Output = Result<CollectionDetail, CatalogError>> + Send;

    fn delete_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn add_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn remove_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Idempotently register the caller, an empty display name is stored as NULL
    fn sync_user(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> impl Future<Output = Result<User, CatalogError>> + Send;
}

/// Reasons a bearer credential is rejected
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token has no subject")]
    MissingSubject,
}

/// Verifies a bearer credential and yields the caller's identity
#[cfg_attr(test, mockall::automock)]
pub trait IdentityResolver: Send + Sync + 'static {
    fn resolve(&self, token: &str) -> Result<Identity, IdentityError>;
}
