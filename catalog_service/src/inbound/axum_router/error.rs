use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;

use crate::domain::error::CatalogError;

/// A plain old json error response, every non-2xx body has this shape
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct ErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
}

#[derive(Debug, Error)]
pub enum CatalogHttpError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("An internal server error has occurred")]
    Internal(#[source] CatalogError),
}

impl CatalogHttpError {
    fn status(&self) -> StatusCode {
        match self {
            CatalogHttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CatalogHttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CatalogHttpError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogHttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for CatalogHttpError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => CatalogHttpError::BadRequest(msg),
            CatalogError::NotFound(msg) => CatalogHttpError::NotFound(msg),
            err @ (CatalogError::Integrity(_) | CatalogError::Storage(_)) => {
                CatalogHttpError::Internal(err)
            }
        }
    }
}

impl From<JsonRejection> for CatalogHttpError {
    fn from(rejection: JsonRejection) -> Self {
        CatalogHttpError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for CatalogHttpError {
    fn from(rejection: PathRejection) -> Self {
        CatalogHttpError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for CatalogHttpError {
    fn from(rejection: QueryRejection) -> Self {
        CatalogHttpError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for CatalogHttpError {
    fn into_response(self) -> axum::response::Response {
        if let CatalogHttpError::Internal(err) = &self {
            tracing::error!(error = ?err, "request failed");
        }

        (
            self.status(),
            Json(ErrorResponse {
                message: &self.to_string(),
            }),
        )
            .into_response()
    }
}
