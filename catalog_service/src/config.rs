use anyhow::Context;
use catalog_service::outbound::{JwtIdentityConfig, JwtKey};

pub use catalog_entrypoint::Environment;

/// Configuration parameters for the application.
pub struct Config {
    /// The connection URL for the catalog Postgres database
    pub database_url: String,
    /// The port to listen for HTTP requests on.
    pub port: u16,
    /// The environment we are in
    pub environment: Environment,
    /// How bearer tokens are verified
    pub identity: JwtIdentityConfig,
    /// Origins allowed to make credentialed cross origin requests
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be provided")?;
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let environment = Environment::new_or_prod();

        let issuer =
            std::env::var("IDENTITY_ISSUER").context("IDENTITY_ISSUER must be provided")?;
        let audience = non_empty_var("IDENTITY_AUDIENCE");
        let key = match (
            non_empty_var("IDENTITY_PUBLIC_KEY"),
            non_empty_var("IDENTITY_JWT_SECRET"),
        ) {
            (Some(pem), _) => JwtKey::RsaPem(pem),
            (None, Some(secret)) => JwtKey::Secret(secret),
            (None, None) => anyhow::bail!(
                "either IDENTITY_PUBLIC_KEY or IDENTITY_JWT_SECRET must be provided"
            ),
        };

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        Config::new(
            database_url,
            port,
            environment,
            issuer,
            audience,
            key,
            cors_allowed_origins,
        )
    }

    fn new(
        database_url: String,
        port: u16,
        environment: Environment,
        issuer: String,
        audience: Option<String>,
        key: JwtKey,
        cors_allowed_origins: Vec<String>,
    ) -> anyhow::Result<Self> {
        if !(issuer.starts_with("http://") || issuer.starts_with("https://")) {
            anyhow::bail!("IDENTITY_ISSUER must start with http:// or https://, got {issuer}");
        }

        Ok(Config {
            database_url,
            port,
            environment,
            identity: JwtIdentityConfig {
                issuer,
                audience,
                key,
            },
            cors_allowed_origins,
        })
    }

    /// Connection pool bounds for the current environment
    pub fn pool_size(&self) -> (u32, u32) {
        match self.environment {
            Environment::Production => (5, 30),
            Environment::Develop => (3, 20),
            Environment::Local => (3, 10),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
