//! Inbound adapters - the http surface of the catalog

pub mod axum_router;
