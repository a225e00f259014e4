use crate::api::context::{ApiContext, CatalogServiceType};
use anyhow::Context;
use axum::{
    Json, Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::from_fn_with_state,
    routing::get,
};
use catalog_service::{
    inbound::axum_router::{AuthState, CatalogRouterState, authenticate, catalog_router},
    outbound::JwtIdentityResolver,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod context;
mod health;
pub mod swagger;

pub async fn setup_and_serve(state: ApiContext) -> anyhow::Result<()> {
    let cors = cors_layer(&state.config.cors_allowed_origins)?;

    let port = state.config.port;
    let env = state.config.environment;
    let app = api_router(&state)
        .layer(TraceLayer::new_for_http())
        .merge(health::router())
        .route("/api-doc/openapi.json", get(openapi))
        .layer(cors);

    let bind_address = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind to address {}", bind_address))?;

    tracing::info!(
        "catalog service is up and running with environment {:?} on port {}",
        &env,
        &port
    );

    axum::serve(listener, app.into_make_service())
        .await
        .context("error running axum server")
}

fn api_router(ctx: &ApiContext) -> Router {
    catalog_router(CatalogRouterState::from_arc(ctx.service.clone())).layer(from_fn_with_state(
        AuthState::new(ctx.service.clone(), ctx.resolver.clone()),
        authenticate::<CatalogServiceType, JwtIdentityResolver>,
    ))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(swagger::ApiDoc::openapi())
}

/// Credentials are allowed, so origins have to be listed explicitly
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid cors origin {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true))
}
