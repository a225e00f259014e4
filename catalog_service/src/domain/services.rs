//! The catalog service implementation over abstract storage ports

use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{
        Collection, CollectionDetail, DeleteOutcome, MAX_NAME_LEN, MembershipChange, Product,
        ProductCategory, ProductDraft, User,
    },
    ports::{CatalogService, CollectionRepo, ProductRepo, UserRepo},
};


/// struct which implements [CatalogService] on top of the storage ports, validating
/// every input before storage is touched
pub struct CatalogServiceImpl<P, C, U> {
    products: P,
    collections: C,
    users: U,
}

impl<P, C, U> CatalogServiceImpl<P, C, U>
where
    P: ProductRepo,
    C: CollectionRepo,
    U: UserRepo,
{
    pub fn new(products: P, collections: C, users: U) -> Self {
        CatalogServiceImpl {
            products,
            collections,
            users,
        }
    }
}

fn collection_not_found() -> CatalogError {
    CatalogError::NotFound("Collection not found or access denied".to_string())
}

/// Blank names are stored as NULL, long ones are cut to the column width
fn normalize_display_name(display_name: &str) -> Option<String> {
    let name = display_name.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.chars().take(MAX_NAME_LEN).collect())
}

fn validate_collection_name(name: Option<&str>) -> Result<(), CatalogError> {
    match name {
        Some(n) if n.chars().count() > MAX_NAME_LEN => Err(CatalogError::Validation(format!(
            "Field 'name' must be at most {MAX_NAME_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

impl<P, C, U> CatalogService for CatalogServiceImpl<P, C, U>
where
    P: ProductRepo,
    C: CollectionRepo,
    U: UserRepo,
{
    #[tracing::instrument(skip(self, draft), fields(category = %draft.category()))]
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.validate()?;
        let product = self.products.create_product(draft).await?;
        tracing::info!(product_id = %product.id, "created product");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<Product, CatalogError> {
        let record = self
            .products
            .get_product(category, id)
            .await?
            .ok_or_else(|| category.not_found())?;

        match record.details {
            Some(details) => Ok(Product {
                id: record.id,
                name: record.name,
                sequence_number: record.sequence_number,
                details,
            }),
            None => {
                tracing::error!(product_id = %id, %category, "product is missing its detail row");
                Err(CatalogError::Integrity(format!(
                    "product {id} has no {category} details"
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, draft), fields(category = %draft.category()))]
    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.validate()?;
        let category = draft.category();
        self.products
            .update_product(id, draft)
            .await?
            .ok_or_else(|| category.not_found())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<DeleteOutcome, CatalogError> {
        let outcome = DeleteOutcome::from(self.products.delete_product(category, id).await?);
        if outcome == DeleteOutcome::AlreadyAbsent {
            tracing::debug!(product_id = %id, "nothing to delete");
        }
        Ok(outcome)
    }

    #[tracing::instrument(skip(self))]
    async fn list_products(&self, category: ProductCategory) -> Result<Vec<Product>, CatalogError> {
        let records = self.products.list_products(category).await?;
        Ok(records
            .into_iter()
            .map(|record| {
                if record.details.is_none() {
                    tracing::warn!(
                        product_id = %record.id,
                        %category,
                        "listing product without detail row"
                    );
                }
                record.into_product_or_empty()
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn create_collection(
        &self,
        owner_id: &str,
        name: Option<String>,
    ) -> Result<Collection, CatalogError> {
        validate_collection_name(name.as_deref())?;
        self.collections.create_collection(owner_id, name).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_collections(&self, owner_id: &str) -> Result<Vec<Collection>, CatalogError> {
        self.collections.list_collections(owner_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        include_products: bool,
    ) -> Result<CollectionDetail, CatalogError> {
        self.collections
            .get_collection(owner_id, collection_id, include_products)
            .await?
            .ok_or_else(collection_not_found)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
    ) -> Result<(), CatalogError> {
        if self
            .collections
            .delete_collection(owner_id, collection_id)
            .await?
        {
            Ok(())
        } else {
            Err(collection_not_found())
        }
    }

    #[tracing::instrument(skip(self))]
    async fn add_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), CatalogError> {
        match self
            .collections
            .add_member(owner_id, collection_id, product_id)
            .await?
        {
            MembershipChange::Applied | MembershipChange::Unchanged => Ok(()),
            MembershipChange::CollectionNotFound => Err(collection_not_found()),
            MembershipChange::ProductNotFound => Err(CatalogError::Validation(
                "Product to add does not exist".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn remove_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), CatalogError> {
        match self
            .collections
            .remove_member(owner_id, collection_id, product_id)
            .await?
        {
            MembershipChange::CollectionNotFound => Err(collection_not_found()),
            MembershipChange::Applied
            | MembershipChange::Unchanged
            | MembershipChange::ProductNotFound => Ok(()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn sync_user(&self, external_id: &str, display_name: &str) -> Result<User, CatalogError> {
        if external_id.is_empty() {
            return Err(CatalogError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        if external_id.chars().count() > MAX_NAME_LEN {
            return Err(CatalogError::Validation(format!(
                "user id must be at most {MAX_NAME_LEN} characters"
            )));
        }
        self.users
            .upsert_user(external_id, normalize_display_name(display_name))
            .await
    }
}
