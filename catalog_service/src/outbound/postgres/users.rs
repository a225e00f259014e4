//! User registry storage

use sqlx::PgPool;

use crate::domain::{error::CatalogError, models::User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
}

/// Single statement upsert, the last writer's name wins
#[tracing::instrument(skip(pool))]
pub async fn upsert_user(
    pool: &PgPool,
    id: &str,
    name: Option<String>,
) -> Result<User, CatalogError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await
    .inspect_err(|e| tracing::error!(error = ?e, user_id = %id, "failed to upsert user"))?;

    Ok(User {
        id: row.id,
        name: row.name,
    })
}
