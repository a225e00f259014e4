//! Outbound adapters - implementations of domain ports

#[cfg(test)]
pub(crate) mod in_memory;
pub mod jwt_identity;
pub mod postgres;

pub use jwt_identity::{JwtIdentityConfig, JwtIdentityResolver, JwtKey};
pub use postgres::PgCatalogRepo;
