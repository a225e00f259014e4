//! Product storage operations over the base table and the four detail tables

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::{
    error::CatalogError,
    models::{
        BookDetails, FilmSeriesDetails, FilmSeriesKind, GameDetails, MangaDetails, Product,
        ProductCategory, ProductDetails, ProductDraft, ProductRecord,
    },
};

/// A product row left joined with its detail row; absent detail columns are NULL.
/// `detail_id` is NULL exactly when the detail row is missing.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    sequence_number: Option<i32>,
    detail_id: Option<Uuid>,
    author: Option<String>,
    language: Option<String>,
    genre: Option<String>,
    platform: Option<String>,
    kind: Option<FilmSeriesKind>,
}

impl ProductRow {
    fn into_record(self, category: ProductCategory) -> ProductRecord {
        let details = self.detail_id.map(|_| match category {
            ProductCategory::Book => ProductDetails::Book(BookDetails {
                author: self.author,
                language: self.language,
                genre: self.genre,
            }),
            ProductCategory::Manga => ProductDetails::Manga(MangaDetails {
                mangaka: self.author,
                language: self.language,
                genre: self.genre,
            }),
            ProductCategory::Game => ProductDetails::Game(GameDetails {
                platform: self.platform,
                genre: self.genre,
            }),
            ProductCategory::FilmSeries => ProductDetails::FilmSeries(FilmSeriesDetails {
                kind: self.kind,
                genre: self.genre,
            }),
        });

        ProductRecord {
            id: self.id,
            name: self.name,
            sequence_number: self.sequence_number,
            category,
            details,
        }
    }
}

fn detail_table(category: ProductCategory) -> &'static str {
    match category {
        ProductCategory::Book => "books",
        ProductCategory::Manga => "mangas",
        ProductCategory::Game => "games",
        ProductCategory::FilmSeries => "film_series",
    }
}

/// Maps the detail columns of a category onto the shared [ProductRow] shape
fn detail_projection(category: ProductCategory) -> &'static str {
    match category {
        ProductCategory::Book => {
            "d.author, d.language, d.genre, NULL::text AS platform, NULL::film_series_kind AS kind"
        }
        ProductCategory::Manga => {
            "d.mangaka AS author, d.language, d.genre, NULL::text AS platform, \
             NULL::film_series_kind AS kind"
        }
        ProductCategory::Game => {
            "NULL::text AS author, NULL::text AS language, d.genre, d.platform, \
             NULL::film_series_kind AS kind"
        }
        ProductCategory::FilmSeries => {
            "NULL::text AS author, NULL::text AS language, d.genre, NULL::text AS platform, d.kind"
        }
    }
}

fn select_products(category: ProductCategory, by_id: bool) -> String {
    let filter = if by_id { " AND p.id = $2" } else { "" };
    format!(
        r#"
        SELECT p.id, p.name, p.sequence_number, d.product_id AS detail_id, {projection}
        FROM products p
        LEFT JOIN {table} d ON d.product_id = p.id
        WHERE p.category = $1{filter}
        ORDER BY p.id
        "#,
        projection = detail_projection(category),
        table = detail_table(category),
    )
}

/// Writes the detail row of a product. With `update` set an existing row is
/// overwritten and the number of affected rows is returned.
async fn write_details(
    conn: &mut PgConnection,
    id: Uuid,
    details: &ProductDetails,
    update: bool,
) -> Result<u64, CatalogError> {
    let result = match (details, update) {
        (ProductDetails::Book(b), false) => {
            sqlx::query(
                "INSERT INTO books (product_id, author, language, genre) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&b.author)
            .bind(&b.language)
            .bind(&b.genre)
            .execute(&mut *conn)
            .await?
        }
        (ProductDetails::Book(b), true) => {
            sqlx::query(
                "UPDATE books SET author = $2, language = $3, genre = $4 WHERE product_id = $1",
            )
            .bind(id)
            .bind(&b.author)
            .bind(&b.language)
            .bind(&b.genre)
            .execute(&mut *conn)
            .await?
        }
        (ProductDetails::Manga(m), false) => {
            sqlx::query(
                "INSERT INTO mangas (product_id, mangaka, language, genre) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&m.mangaka)
            .bind(&m.language)
            .bind(&m.genre)
            .execute(&mut *conn)
            .await?
        }
        (ProductDetails::Manga(m), true) => {
            sqlx::query(
                "UPDATE mangas SET mangaka = $2, language = $3, genre = $4 WHERE product_id = $1",
            )
            .bind(id)
            .bind(&m.mangaka)
            .bind(&m.language)
            .bind(&m.genre)
            .execute(&mut *conn)
            .await?
        }
        (ProductDetails::Game(g), false) => {
            sqlx::query("INSERT INTO games (product_id, platform, genre) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(&g.platform)
                .bind(&g.genre)
                .execute(&mut *conn)
                .await?
        }
        (ProductDetails::Game(g), true) => {
            sqlx::query("UPDATE games SET platform = $2, genre = $3 WHERE product_id = $1")
                .bind(id)
                .bind(&g.platform)
                .bind(&g.genre)
                .execute(&mut *conn)
                .await?
        }
        (ProductDetails::FilmSeries(f), false) => {
            sqlx::query("INSERT INTO film_series (product_id, kind, genre) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(f.kind)
                .bind(&f.genre)
                .execute(&mut *conn)
                .await?
        }
        (ProductDetails::FilmSeries(f), true) => {
            sqlx::query("UPDATE film_series SET kind = $2, genre = $3 WHERE product_id = $1")
                .bind(id)
                .bind(f.kind)
                .bind(&f.genre)
                .execute(&mut *conn)
                .await?
        }
    };

    Ok(result.rows_affected())
}

#[tracing::instrument(skip(pool, draft), fields(category = %draft.category()))]
pub async fn create_product(pool: &PgPool, draft: ProductDraft) -> Result<Product, CatalogError> {
    let id = Uuid::now_v7();
    let category = draft.category();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO products (id, name, sequence_number, category)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(&draft.name)
    .bind(draft.sequence_number)
    .bind(category.as_str())
    .execute(&mut *tx)
    .await
    .inspect_err(|e| tracing::error!(error = ?e, product_id = %id, "failed to insert product"))?;

    write_details(&mut *tx, id, &draft.details, false)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, product_id = %id, "failed to insert details")
        })?;

    tx.commit().await?;

    Ok(Product {
        id,
        name: draft.name,
        sequence_number: draft.sequence_number,
        details: draft.details,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn get_product(
    pool: &PgPool,
    category: ProductCategory,
    id: Uuid,
) -> Result<Option<ProductRecord>, CatalogError> {
    let sql = select_products(category, true);
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(category.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.into_record(category)))
}

#[tracing::instrument(skip(pool, draft), fields(category = %draft.category()))]
pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    draft: ProductDraft,
) -> Result<Option<Product>, CatalogError> {
    let category = draft.category();
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE products
        SET name = $3, sequence_number = $4
        WHERE id = $1 AND category = $2
        "#,
    )
    .bind(id)
    .bind(category.as_str())
    .bind(&draft.name)
    .bind(draft.sequence_number)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    let details_updated = write_details(&mut *tx, id, &draft.details, true).await?;
    if details_updated == 0 {
        // tx is dropped without commit, the base update rolls back
        tracing::error!(product_id = %id, %category, "product is missing its detail row");
        return Err(CatalogError::Integrity(format!(
            "product {id} has no {category} details"
        )));
    }

    tx.commit().await?;

    Ok(Some(Product {
        id,
        name: draft.name,
        sequence_number: draft.sequence_number,
        details: draft.details,
    }))
}

/// The detail row goes by cascade
#[tracing::instrument(skip(pool))]
pub async fn delete_product(
    pool: &PgPool,
    category: ProductCategory,
    id: Uuid,
) -> Result<bool, CatalogError> {
    let deleted = sqlx::query("DELETE FROM products WHERE id = $1 AND category = $2")
        .bind(id)
        .bind(category.as_str())
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

#[tracing::instrument(skip(pool))]
pub async fn list_products(
    pool: &PgPool,
    category: ProductCategory,
) -> Result<Vec<ProductRecord>, CatalogError> {
    let sql = select_products(category, false);
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(category.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into_record(category)).collect())
}
