//! The four product endpoint families. They only differ in path, category and
//! the category specific json fields, so one set of handlers serves them all.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::{CatalogRouterState, error::CatalogHttpError};
use crate::domain::{
    error::CatalogError,
    models::{
        BookDetails, DeleteOutcome, FilmSeriesDetails, FilmSeriesKind, GameDetails, MangaDetails,
        Product, ProductCategory, ProductDetails, ProductDraft,
    },
    ports::CatalogService,
};

/// Binds a product category to its http surface
pub trait CategoryResource: Send + Sync + 'static {
    const CATEGORY: ProductCategory;

    type Request: DeserializeOwned + Send + 'static;

    fn into_draft(req: Self::Request) -> Result<ProductDraft, CatalogError>;
}

/// `/books`
pub enum Books {}
/// `/mangas`
pub enum Mangas {}
/// `/spiel`
pub enum Games {}
/// `/filmserie`
pub enum FilmSeriesResource {}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    pub name: String,
    pub nummer: Option<i32>,
    pub autor: Option<String>,
    pub sprache: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MangaRequest {
    #[serde(default)]
    pub name: String,
    pub nummer: Option<i32>,
    pub mangaka: Option<String>,
    pub sprache: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GameRequest {
    #[serde(default)]
    pub name: String,
    pub nummer: Option<i32>,
    pub konsole: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FilmSeriesRequest {
    #[serde(default)]
    pub name: String,
    pub nummer: Option<i32>,
    /// `Film` or `Serie`
    pub art: Option<String>,
    pub genre: Option<String>,
}

impl CategoryResource for Books {
    const CATEGORY: ProductCategory = ProductCategory::Book;
    type Request = BookRequest;

    fn into_draft(req: BookRequest) -> Result<ProductDraft, CatalogError> {
        Ok(ProductDraft {
            name: req.name,
            sequence_number: req.nummer,
            details: ProductDetails::Book(BookDetails {
                author: req.autor,
                language: req.sprache,
                genre: req.genre,
            }),
        })
    }
}

impl CategoryResource for Mangas {
    const CATEGORY: ProductCategory = ProductCategory::Manga;
    type Request = MangaRequest;

    fn into_draft(req: MangaRequest) -> Result<ProductDraft, CatalogError> {
        Ok(ProductDraft {
            name: req.name,
            sequence_number: req.nummer,
            details: ProductDetails::Manga(MangaDetails {
                mangaka: req.mangaka,
                language: req.sprache,
                genre: req.genre,
            }),
        })
    }
}

impl CategoryResource for Games {
    const CATEGORY: ProductCategory = ProductCategory::Game;
    type Request = GameRequest;

    fn into_draft(req: GameRequest) -> Result<ProductDraft, CatalogError> {
        Ok(ProductDraft {
            name: req.name,
            sequence_number: req.nummer,
            details: ProductDetails::Game(GameDetails {
                platform: req.konsole,
                genre: req.genre,
            }),
        })
    }
}

impl CategoryResource for FilmSeriesResource {
    const CATEGORY: ProductCategory = ProductCategory::FilmSeries;
    type Request = FilmSeriesRequest;

    fn into_draft(req: FilmSeriesRequest) -> Result<ProductDraft, CatalogError> {
        let kind = req
            .art
            .as_deref()
            .map(str::parse::<FilmSeriesKind>)
            .transpose()?;
        Ok(ProductDraft {
            name: req.name,
            sequence_number: req.nummer,
            details: ProductDetails::FilmSeries(FilmSeriesDetails {
                kind,
                genre: req.genre,
            }),
        })
    }
}

/// Category specific fields, flattened into [ProductResponse]
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum DetailsResponse {
    Book {
        autor: Option<String>,
        sprache: Option<String>,
        genre: Option<String>,
    },
    Manga {
        mangaka: Option<String>,
        sprache: Option<String>,
        genre: Option<String>,
    },
    Game {
        konsole: Option<String>,
        genre: Option<String>,
    },
    FilmSeries {
        art: Option<FilmSeriesKind>,
        genre: Option<String>,
    },
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub nummer: Option<i32>,
    #[serde(flatten)]
    pub details: DetailsResponse,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let details = match product.details {
            ProductDetails::Book(b) => DetailsResponse::Book {
                autor: b.author,
                sprache: b.language,
                genre: b.genre,
            },
            ProductDetails::Manga(m) => DetailsResponse::Manga {
                mangaka: m.mangaka,
                sprache: m.language,
                genre: m.genre,
            },
            ProductDetails::Game(g) => DetailsResponse::Game {
                konsole: g.platform,
                genre: g.genre,
            },
            ProductDetails::FilmSeries(f) => DetailsResponse::FilmSeries {
                art: f.kind,
                genre: f.genre,
            },
        };

        ProductResponse {
            id: product.id,
            name: product.name,
            nummer: product.sequence_number,
            details,
        }
    }
}

/// Documented handlers and routes of one category. The handlers delegate to the
/// generic ones below.
macro_rules! category_endpoints {
    (
        $module:ident,
        $resource:ident,
        $request:ident,
        collection = $collection:tt,
        item = $item:tt,
        doc_item = $doc_item:tt $(,)?
    ) => {
        pub mod $module {
            use axum::{
                Json, Router,
                extract::{
                    Path, State,
                    rejection::{JsonRejection, PathRejection},
                },
                http::StatusCode,
                routing::{get, post},
            };
            use uuid::Uuid;

            use super::{$request, $resource, ProductResponse};
            use crate::{
                domain::ports::CatalogService,
                inbound::axum_router::{
                    CatalogRouterState,
                    error::{CatalogHttpError, ErrorResponse},
                },
            };

            pub(in crate::inbound::axum_router) fn routes<T: CatalogService>()
            -> Router<CatalogRouterState<T>> {
                Router::new()
                    .route($collection, post(create::<T>).get(list::<T>))
                    .route(
                        $item,
                        get(read::<T>).put(update::<T>).delete(remove::<T>),
                    )
            }

            #[utoipa::path(
                post,
                path = $collection,
                operation_id = concat!("create_", stringify!($module)),
                request_body = $request,
                responses(
                    (status = 201, body = ProductResponse),
                    (status = 400, body = ErrorResponse),
                    (status = 401, body = ErrorResponse),
                    (status = 500, body = ErrorResponse),
                )
            )]
            pub async fn create<T: CatalogService>(
                state: State<CatalogRouterState<T>>,
                body: Result<Json<$request>, JsonRejection>,
            ) -> Result<(StatusCode, Json<ProductResponse>), CatalogHttpError> {
                super::create_product::<T, $resource>(state, body).await
            }

            #[utoipa::path(
                get,
                path = $collection,
                operation_id = concat!("list_", stringify!($module)),
                responses(
                    (status = 200, body = Vec<ProductResponse>),
                    (status = 401, body = ErrorResponse),
                    (status = 500, body = ErrorResponse),
                )
            )]
            pub async fn list<T: CatalogService>(
                state: State<CatalogRouterState<T>>,
            ) -> Result<Json<Vec<ProductResponse>>, CatalogHttpError> {
                super::list_products::<T, $resource>(state).await
            }

            #[utoipa::path(
                get,
                path = $doc_item,
                operation_id = concat!("get_", stringify!($module)),
                params(("id" = Uuid, Path, description = "product id")),
                responses(
                    (status = 200, body = ProductResponse),
                    (status = 400, body = ErrorResponse),
                    (status = 401, body = ErrorResponse),
                    (status = 404, body = ErrorResponse),
                    (status = 500, body = ErrorResponse),
                )
            )]
            pub async fn read<T: CatalogService>(
                state: State<CatalogRouterState<T>>,
                id: Result<Path<Uuid>, PathRejection>,
            ) -> Result<Json<ProductResponse>, CatalogHttpError> {
                super::get_product::<T, $resource>(state, id).await
            }

            #[utoipa::path(
                put,
                path = $doc_item,
                operation_id = concat!("update_", stringify!($module)),
                params(("id" = Uuid, Path, description = "product id")),
                request_body = $request,
                responses(
                    (status = 200, body = ProductResponse),
                    (status = 400, body = ErrorResponse),
                    (status = 401, body = ErrorResponse),
                    (status = 404, body = ErrorResponse),
                    (status = 500, body = ErrorResponse),
                )
            )]
            pub async fn update<T: CatalogService>(
                state: State<CatalogRouterState<T>>,
                id: Result<Path<Uuid>, PathRejection>,
                body: Result<Json<$request>, JsonRejection>,
            ) -> Result<Json<ProductResponse>, CatalogHttpError> {
                super::update_product::<T, $resource>(state, id, body).await
            }

            #[utoipa::path(
                delete,
                path = $doc_item,
                operation_id = concat!("delete_", stringify!($module)),
                params(("id" = Uuid, Path, description = "product id")),
                responses(
                    (status = 204, description = "No Content"),
                    (status = 400, body = ErrorResponse),
                    (status = 401, body = ErrorResponse),
                    (status = 404, body = ErrorResponse),
                    (status = 500, body = ErrorResponse),
                )
            )]
            pub async fn remove<T: CatalogService>(
                state: State<CatalogRouterState<T>>,
                id: Result<Path<Uuid>, PathRejection>,
            ) -> Result<StatusCode, CatalogHttpError> {
                super::delete_product::<T, $resource>(state, id).await
            }
        }
    };
}

category_endpoints!(
    books,
    Books,
    BookRequest,
    collection = "/books",
    item = "/books/:id",
    doc_item = "/books/{id}",
);
category_endpoints!(
    mangas,
    Mangas,
    MangaRequest,
    collection = "/mangas",
    item = "/mangas/:id",
    doc_item = "/mangas/{id}",
);
category_endpoints!(
    games,
    Games,
    GameRequest,
    collection = "/spiel",
    item = "/spiel/:id",
    doc_item = "/spiel/{id}",
);
category_endpoints!(
    film_series,
    FilmSeriesResource,
    FilmSeriesRequest,
    collection = "/filmserie",
    item = "/filmserie/:id",
    doc_item = "/filmserie/{id}",
);

#[tracing::instrument(skip_all, fields(category = %C::CATEGORY))]
async fn create_product<T, C>(
    State(state): State<CatalogRouterState<T>>,
    body: Result<Json<C::Request>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogHttpError>
where
    T: CatalogService,
    C: CategoryResource,
{
    let Json(req) = body?;
    let product = state.service.create_product(C::into_draft(req)?).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[tracing::instrument(skip_all, fields(category = %C::CATEGORY))]
async fn list_products<T, C>(
    State(state): State<CatalogRouterState<T>>,
) -> Result<Json<Vec<ProductResponse>>, CatalogHttpError>
where
    T: CatalogService,
    C: CategoryResource,
{
    let products = state.service.list_products(C::CATEGORY).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[tracing::instrument(skip_all, fields(category = %C::CATEGORY))]
async fn get_product<T, C>(
    State(state): State<CatalogRouterState<T>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProductResponse>, CatalogHttpError>
where
    T: CatalogService,
    C: CategoryResource,
{
    let Path(id) = id?;
    let product = state.service.get_product(C::CATEGORY, id).await?;
    Ok(Json(product.into()))
}

#[tracing::instrument(skip_all, fields(category = %C::CATEGORY))]
async fn update_product<T, C>(
    State(state): State<CatalogRouterState<T>>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<C::Request>, JsonRejection>,
) -> Result<Json<ProductResponse>, CatalogHttpError>
where
    T: CatalogService,
    C: CategoryResource,
{
    let Path(id) = id?;
    let Json(req) = body?;
    let product = state.service.update_product(id, C::into_draft(req)?).await?;
    Ok(Json(product.into()))
}

#[tracing::instrument(skip_all, fields(category = %C::CATEGORY))]
async fn delete_product<T, C>(
    State(state): State<CatalogRouterState<T>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, CatalogHttpError>
where
    T: CatalogService,
    C: CategoryResource,
{
    let Path(id) = id?;
    match state.service.delete_product(C::CATEGORY, id).await? {
        DeleteOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
        DeleteOutcome::AlreadyAbsent => Err(C::CATEGORY.not_found().into()),
    }
}
