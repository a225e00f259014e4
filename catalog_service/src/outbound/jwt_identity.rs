//! [IdentityResolver] backed by locally verified JWTs

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::{
    models::Identity,
    ports::{IdentityError, IdentityResolver},
};

/// The key the identity provider signs its tokens with
#[derive(Debug, Clone)]
pub enum JwtKey {
    /// RS256 public key in PEM format
    RsaPem(String),
    /// HS256 shared secret
    Secret(String),
}

#[derive(Debug, Clone)]
pub struct JwtIdentityConfig {
    pub issuer: String,
    /// when unset the `aud` claim is not checked
    pub audience: Option<String>,
    pub key: JwtKey,
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl IdentityClaims {
    /// `preferred_username`, else the local part of `email`, else empty
    fn display_name(&self) -> String {
        if let Some(name) = self.preferred_username.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or_default()
            .to_string()
    }
}

pub struct JwtIdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(config: JwtIdentityConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let (key, mut validation) = match &config.key {
            JwtKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())?,
                Validation::new(Algorithm::RS256),
            ),
            JwtKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Validation::new(Algorithm::HS256),
            ),
        };

        validation.set_issuer(&[config.issuer.as_str()]);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }
}

impl IdentityResolver for JwtIdentityResolver {
    #[tracing::instrument(skip_all)]
    fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        let claims = match decode::<IdentityClaims>(token, &self.key, &self.validation) {
            Ok(decoded) => decoded.claims,
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    return Err(IdentityError::Expired);
                }
                _ => return Err(IdentityError::Invalid(e.to_string())),
            },
        };

        let display_name = claims.display_name();
        let subject_id = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::MissingSubject)?;

        Ok(Identity {
            subject_id,
            display_name,
        })
    }
}
