//! Collection and membership storage operations, always filtered by owner

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{Collection, CollectionDetail, MembershipChange, ProductCategory, ProductSummary},
};

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: Uuid,
    user_id: String,
    name: Option<String>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Collection {
            id: row.id,
            owner_id: row.user_id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    sequence_number: Option<i32>,
    category: String,
}

impl TryFrom<MemberRow> for ProductSummary {
    type Error = CatalogError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let category: ProductCategory = row.category.parse().map_err(|_| {
            CatalogError::Integrity(format!(
                "product {} has unknown category {}",
                row.id, row.category
            ))
        })?;
        Ok(ProductSummary {
            id: row.id,
            name: row.name,
            sequence_number: row.sequence_number,
            category,
        })
    }
}

async fn find_owned_collection(
    conn: &mut PgConnection,
    owner_id: &str,
    collection_id: Uuid,
) -> Result<Option<Collection>, CatalogError> {
    let row = sqlx::query_as::<_, CollectionRow>(
        "SELECT id, user_id, name FROM collections WHERE id = $1 AND user_id = $2",
    )
    .bind(collection_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Collection::from))
}

#[tracing::instrument(skip(pool))]
pub async fn create_collection(
    pool: &PgPool,
    owner_id: &str,
    name: Option<String>,
) -> Result<Collection, CatalogError> {
    let row = sqlx::query_as::<_, CollectionRow>(
        r#"
        INSERT INTO collections (id, user_id, name)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, name
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(owner_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

#[tracing::instrument(skip(pool))]
pub async fn list_collections(
    pool: &PgPool,
    owner_id: &str,
) -> Result<Vec<Collection>, CatalogError> {
    let rows = sqlx::query_as::<_, CollectionRow>(
        r#"
        SELECT id, user_id, name
        FROM collections
        WHERE user_id = $1
        ORDER BY name ASC NULLS LAST, id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Collection::from).collect())
}

#[tracing::instrument(skip(pool))]
pub async fn get_collection(
    pool: &PgPool,
    owner_id: &str,
    collection_id: Uuid,
    include_products: bool,
) -> Result<Option<CollectionDetail>, CatalogError> {
    let mut conn = pool.acquire().await?;

    let Some(collection) = find_owned_collection(&mut *conn, owner_id, collection_id).await? else {
        return Ok(None);
    };

    let products = if include_products {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT p.id, p.name, p.sequence_number, p.category
            FROM collection_products cp
            JOIN products p ON p.id = cp.product_id
            WHERE cp.collection_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(collection_id)
        .fetch_all(&mut *conn)
        .await?;

        Some(
            rows.into_iter()
                .map(ProductSummary::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        None
    };

    Ok(Some(CollectionDetail {
        collection,
        products,
    }))
}

/// Memberships go by cascade
#[tracing::instrument(skip(pool))]
pub async fn delete_collection(
    pool: &PgPool,
    owner_id: &str,
    collection_id: Uuid,
) -> Result<bool, CatalogError> {
    let deleted = sqlx::query("DELETE FROM collections WHERE id = $1 AND user_id = $2")
        .bind(collection_id)
        .bind(owner_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

#[tracing::instrument(skip(pool))]
pub async fn add_member(
    pool: &PgPool,
    owner_id: &str,
    collection_id: Uuid,
    product_id: Uuid,
) -> Result<MembershipChange, CatalogError> {
    let mut tx = pool.begin().await?;

    if find_owned_collection(&mut *tx, owner_id, collection_id)
        .await?
        .is_none()
    {
        return Ok(MembershipChange::CollectionNotFound);
    }

    let product_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;
    if !product_exists {
        return Ok(MembershipChange::ProductNotFound);
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO collection_products (collection_id, product_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(collection_id)
    .bind(product_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(if inserted > 0 {
        MembershipChange::Applied
    } else {
        MembershipChange::Unchanged
    })
}

#[tracing::instrument(skip(pool))]
pub async fn remove_member(
    pool: &PgPool,
    owner_id: &str,
    collection_id: Uuid,
    product_id: Uuid,
) -> Result<MembershipChange, CatalogError> {
    let mut tx = pool.begin().await?;

    if find_owned_collection(&mut *tx, owner_id, collection_id)
        .await?
        .is_none()
    {
        return Ok(MembershipChange::CollectionNotFound);
    }

    let removed = sqlx::query(
        "DELETE FROM collection_products WHERE collection_id = $1 AND product_id = $2",
    )
    .bind(collection_id)
    .bind(product_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(if removed > 0 {
        MembershipChange::Applied
    } else {
        MembershipChange::Unchanged
    })
}
