use catalog_service::{
    domain::models::{FilmSeriesKind, ProductCategory, ProductSummary, User},
    inbound::axum_router::{
        ErrorResponse,
        collections::{
            AddMemberRequest, CollectionResponse, CreateCollectionRequest, StatusResponse,
        },
        products::{
            BookRequest, DetailsResponse, FilmSeriesRequest, GameRequest, MangaRequest,
            ProductResponse,
        },
        users::SyncUserResponse,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog_service::inbound::axum_router::users::sync_user,
        // Products
        catalog_service::inbound::axum_router::products::books::create,
        catalog_service::inbound::axum_router::products::books::list,
        catalog_service::inbound::axum_router::products::books::read,
        catalog_service::inbound::axum_router::products::books::update,
        catalog_service::inbound::axum_router::products::books::remove,
        catalog_service::inbound::axum_router::products::mangas::create,
        catalog_service::inbound::axum_router::products::mangas::list,
        catalog_service::inbound::axum_router::products::mangas::read,
        catalog_service::inbound::axum_router::products::mangas::update,
        catalog_service::inbound::axum_router::products::mangas::remove,
        catalog_service::inbound::axum_router::products::games::create,
        catalog_service::inbound::axum_router::products::games::list,
        catalog_service::inbound::axum_router::products::games::read,
        catalog_service::inbound::axum_router::products::games::update,
        catalog_service::inbound::axum_router::products::games::remove,
        catalog_service::inbound::axum_router::products::film_series::create,
        catalog_service::inbound::axum_router::products::film_series::list,
        catalog_service::inbound::axum_router::products::film_series::read,
        catalog_service::inbound::axum_router::products::film_series::update,
        catalog_service::inbound::axum_router::products::film_series::remove,
        // Collections
        catalog_service::inbound::axum_router::collections::create_collection,
        catalog_service::inbound::axum_router::collections::list_collections,
        catalog_service::inbound::axum_router::collections::get_collection,
        catalog_service::inbound::axum_router::collections::delete_collection,
        catalog_service::inbound::axum_router::collections::add_member,
        catalog_service::inbound::axum_router::collections::remove_member,
    ),
    components(
        schemas(
            BookRequest,
            MangaRequest,
            GameRequest,
            FilmSeriesRequest,
            ProductResponse,
            DetailsResponse,
            CreateCollectionRequest,
            AddMemberRequest,
            CollectionResponse,
            StatusResponse,
            SyncUserResponse,
            ErrorResponse,
            User,
            ProductSummary,
            ProductCategory,
            FilmSeriesKind,
        )
    ),
    tags(
        (name = "catalog service", description = "Media catalog and collections")
    )
)]
pub struct ApiDoc;
