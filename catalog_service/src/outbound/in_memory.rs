//! In-memory storage for router tests.
//!
//! Mirrors the semantics of the PostgreSQL adapter: category scoped product
//! lookups, owner scoped collections, idempotent memberships and upserted users.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{
        Collection, CollectionDetail, MembershipChange, Product, ProductCategory, ProductDraft,
        ProductRecord, ProductSummary, User,
    },
    ports::{CollectionRepo, ProductRepo, UserRepo},
};

#[derive(Default)]
struct State {
    products: BTreeMap<Uuid, Product>,
    collections: BTreeMap<Uuid, Collection>,
    members: BTreeSet<(Uuid, Uuid)>,
    users: HashMap<String, User>,
}

/// Thread-safe catalog storage, clones share the same state
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<State>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory catalog lock poisoned")
    }

    fn owned<'a>(state: &'a State, owner_id: &str, id: Uuid) -> Option<&'a Collection> {
        state
            .collections
            .get(&id)
            .filter(|c| c.owner_id == owner_id)
    }
}

fn record(product: &Product) -> ProductRecord {
    ProductRecord {
        id: product.id,
        name: product.name.clone(),
        sequence_number: product.sequence_number,
        category: product.category(),
        details: Some(product.details.clone()),
    }
}

impl ProductRepo for InMemoryCatalog {
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = Product {
            id: Uuid::now_v7(),
            name: draft.name,
            sequence_number: draft.sequence_number,
            details: draft.details,
        };
        self.state().products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        Ok(self
            .state()
            .products
            .get(&id)
            .filter(|p| p.category() == category)
            .map(record))
    }

    async fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> Result<Option<Product>, CatalogError> {
        let mut state = self.state();
        let Some(product) = state
            .products
            .get_mut(&id)
            .filter(|p| p.category() == draft.category())
        else {
            return Ok(None);
        };
        product.name = draft.name;
        product.sequence_number = draft.sequence_number;
        product.details = draft.details;
        Ok(Some(product.clone()))
    }

    async fn delete_product(
        &self,
        category: ProductCategory,
        id: Uuid,
    ) -> Result<bool, CatalogError> {
        let mut state = self.state();
        if !state
            .products
            .get(&id)
            .is_some_and(|p| p.category() == category)
        {
            return Ok(false);
        }
        state.products.remove(&id);
        state.members.retain(|(_, product_id)| *product_id != id);
        Ok(true)
    }

    async fn list_products(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self
            .state()
            .products
            .values()
            .filter(|p| p.category() == category)
            .map(record)
            .collect())
    }
}

impl CollectionRepo for InMemoryCatalog {
    async fn create_collection(
        &self,
        owner_id: &str,
        name: Option<String>,
    ) -> Result<Collection, CatalogError> {
        let collection = Collection {
            id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            name,
        };
        self.state()
            .collections
            .insert(collection.id, collection.clone());
        Ok(collection)
    }

    async fn list_collections(&self, owner_id: &str) -> Result<Vec<Collection>, CatalogError> {
        let mut collections: Vec<Collection> = self
            .state()
            .collections
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        // None sorts first for Option, flip it so unnamed collections come last
        collections.sort_by(|a, b| {
            (a.name.is_none(), &a.name, a.id).cmp(&(b.name.is_none(), &b.name, b.id))
        });
        Ok(collections)
    }

    async fn get_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        include_products: bool,
    ) -> Result<Option<CollectionDetail>, CatalogError> {
        let state = self.state();
        let Some(collection) = Self::owned(&state, owner_id, collection_id).cloned() else {
            return Ok(None);
        };
        let products = include_products.then(|| {
            state
                .members
                .iter()
                .filter(|(c, _)| *c == collection_id)
                .filter_map(|(_, p)| state.products.get(p))
                .map(|p| ProductSummary {
                    id: p.id,
                    name: p.name.clone(),
                    sequence_number: p.sequence_number,
                    category: p.category(),
                })
                .collect()
        });
        Ok(Some(CollectionDetail {
            collection,
            products,
        }))
    }

    async fn delete_collection(
        &self,
        owner_id: &str,
        collection_id: Uuid,
    ) -> Result<bool, CatalogError> {
        let mut state = self.state();
        if Self::owned(&state, owner_id, collection_id).is_none() {
            return Ok(false);
        }
        state.collections.remove(&collection_id);
        state.members.retain(|(c, _)| *c != collection_id);
        Ok(true)
    }

    async fn add_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<MembershipChange, CatalogError> {
        let mut state = self.state();
        if Self::owned(&state, owner_id, collection_id).is_none() {
            return Ok(MembershipChange::CollectionNotFound);
        }
        if !state.products.contains_key(&product_id) {
            return Ok(MembershipChange::ProductNotFound);
        }
        Ok(if state.members.insert((collection_id, product_id)) {
            MembershipChange::Applied
        } else {
            MembershipChange::Unchanged
        })
    }

    async fn remove_member(
        &self,
        owner_id: &str,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<MembershipChange, CatalogError> {
        let mut state = self.state();
        if Self::owned(&state, owner_id, collection_id).is_none() {
            return Ok(MembershipChange::CollectionNotFound);
        }
        Ok(if state.members.remove(&(collection_id, product_id)) {
            MembershipChange::Applied
        } else {
            MembershipChange::Unchanged
        })
    }
}

impl UserRepo for InMemoryCatalog {
    async fn upsert_user(&self, id: &str, name: Option<String>) -> Result<User, CatalogError> {
        let user = User {
            id: id.to_string(),
            name,
        };
        self.state().users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}
