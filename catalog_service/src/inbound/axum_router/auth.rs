//! Bearer token authentication. Every authenticated request registers the
//! caller with the user registry before the handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::CatalogHttpError;
use crate::domain::{
    error::CatalogError,
    ports::{CatalogService, IdentityError, IdentityResolver},
};

pub struct AuthState<T, I> {
    service: Arc<T>,
    resolver: Arc<I>,
}

impl<T, I> Clone for AuthState<T, I> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<T, I> AuthState<T, I>
where
    T: CatalogService,
    I: IdentityResolver,
{
    pub fn new(service: Arc<T>, resolver: Arc<I>) -> Self {
        AuthState { service, resolver }
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware which resolves the bearer token, syncs the caller into the user
/// registry and attaches the resulting [crate::domain::models::User] as an extension
#[tracing::instrument(skip_all, fields(subject_id = tracing::field::Empty))]
pub async fn authenticate<T, I>(
    State(state): State<AuthState<T, I>>,
    mut req: Request,
    next: Next,
) -> Response
where
    T: CatalogService,
    I: IdentityResolver,
{
    let Some(token) = bearer_token(&req) else {
        return CatalogHttpError::Unauthorized("Authorization header missing".to_string())
            .into_response();
    };

    let identity = match state.resolver.resolve(token) {
        Ok(identity) => identity,
        Err(IdentityError::Expired) => {
            tracing::debug!("rejected expired token");
            return CatalogHttpError::Unauthorized("Token has expired".to_string())
                .into_response();
        }
        Err(e) => {
            tracing::info!(error = %e, "rejected token");
            return CatalogHttpError::Unauthorized("Invalid token".to_string()).into_response();
        }
    };

    tracing::Span::current().record("subject_id", identity.subject_id.as_str());

    let user = match state
        .service
        .sync_user(&identity.subject_id, &identity.display_name)
        .await
    {
        Ok(user) => user,
        Err(CatalogError::Validation(msg)) => {
            return CatalogHttpError::Unauthorized(msg).into_response();
        }
        Err(e) => return CatalogHttpError::from(e).into_response(),
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
