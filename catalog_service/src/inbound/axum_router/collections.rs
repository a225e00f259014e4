use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    CatalogRouterState,
    error::{CatalogHttpError, ErrorResponse},
};
use crate::domain::{
    models::{Collection, CollectionDetail, ProductSummary, User},
    ports::CatalogService,
};

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMemberRequest {
    #[serde(rename = "produktId")]
    pub produkt_id: Uuid,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CollectionParams {
    /// `produkte` loads the member products
    #[serde(default)]
    pub include: Option<String>,
}

impl CollectionParams {
    fn include_products(&self) -> bool {
        self.include.as_deref() == Some("produkte")
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CollectionResponse {
    pub id: Uuid,
    #[serde(rename = "webuserId")]
    pub owner_id: String,
    pub name: Option<String>,
    /// only present when requested with `?include=produkte`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produkte: Option<Vec<ProductSummary>>,
}

impl From<Collection> for CollectionResponse {
    fn from(c: Collection) -> Self {
        CollectionResponse {
            id: c.id,
            owner_id: c.owner_id,
            name: c.name,
            produkte: None,
        }
    }
}

impl From<CollectionDetail> for CollectionResponse {
    fn from(detail: CollectionDetail) -> Self {
        CollectionResponse {
            produkte: detail.products,
            ..detail.collection.into()
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MemberPath {
    sammlung_id: Uuid,
    produkt_id: Uuid,
}

/// Creates a collection owned by the caller
#[utoipa::path(
    post,
    path = "/sammlungen",
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, body = CollectionResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_collection<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
    body: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CollectionResponse>), CatalogHttpError> {
    let Json(req) = body?;
    let collection = state.service.create_collection(&user.id, req.name).await?;
    Ok((StatusCode::CREATED, Json(collection.into())))
}

/// Lists the caller's collections ordered by name
#[utoipa::path(
    get,
    path = "/sammlungen",
    responses(
        (status = 200, body = Vec<CollectionResponse>),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_collections<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<CollectionResponse>>, CatalogHttpError> {
    let collections = state.service.list_collections(&user.id).await?;
    Ok(Json(
        collections
            .into_iter()
            .map(CollectionResponse::from)
            .collect(),
    ))
}

/// Gets one of the caller's collections
#[utoipa::path(
    get,
    path = "/sammlungen/{id}",
    params(
        ("id" = Uuid, Path, description = "collection id"),
        CollectionParams,
    ),
    responses(
        (status = 200, body = CollectionResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_collection<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<CollectionParams>, QueryRejection>,
) -> Result<Json<CollectionResponse>, CatalogHttpError> {
    let Path(id) = id?;
    let Query(params) = params?;
    let detail = state
        .service
        .get_collection(&user.id, id, params.include_products())
        .await?;
    Ok(Json(detail.into()))
}

/// Deletes one of the caller's collections, its products are kept
#[utoipa::path(
    delete,
    path = "/sammlungen/{id}",
    params(("id" = Uuid, Path, description = "collection id")),
    responses(
        (status = 204, description = "No Content"),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_collection<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, CatalogHttpError> {
    let Path(id) = id?;
    state.service.delete_collection(&user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a product to one of the caller's collections, adding it twice is a no-op
#[utoipa::path(
    post,
    path = "/sammlung/{sammlung_id}/produkte",
    params(("sammlung_id" = Uuid, Path, description = "collection id")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, body = StatusResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn add_member<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
    collection_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, CatalogHttpError> {
    let Path(collection_id) = collection_id?;
    let Json(req) = body?;
    state
        .service
        .add_member(&user.id, collection_id, req.produkt_id)
        .await?;
    Ok(Json(StatusResponse {
        status: "Product added to collection",
    }))
}

/// Removes a product from one of the caller's collections, removing a non-member is a no-op
#[utoipa::path(
    delete,
    path = "/sammlung/{sammlung_id}/produkte/{produkt_id}",
    params(
        ("sammlung_id" = Uuid, Path, description = "collection id"),
        ("produkt_id" = Uuid, Path, description = "product id"),
    ),
    responses(
        (status = 204, description = "No Content"),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove_member<T: CatalogService>(
    State(state): State<CatalogRouterState<T>>,
    Extension(user): Extension<User>,
    path: Result<Path<MemberPath>, PathRejection>,
) -> Result<StatusCode, CatalogHttpError> {
    let Path(MemberPath {
        sammlung_id,
        produkt_id,
    }) = path?;
    state
        .service
        .remove_member(&user.id, sammlung_id, produkt_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
