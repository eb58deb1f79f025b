use anyhow::{anyhow, Context, Result};
use axum::http::HeaderValue;
use common_auth::JwtConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const DEFAULT_DB_HOST: &str = "cluster0.mongodb.net";
const DEFAULT_DB_NAME: &str = "musicShows";

#[derive(Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub access_token_secret: String,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_leeway_seconds: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests do not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).and_then(|value| normalize_optional(&value));

        let host = var("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("HOST must be an IP address")?;
        let port = match var("PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT '{value}' is not a valid port"))?,
            None => 5000,
        };
        let access_token_secret =
            var("ACCESS_TOKEN_SECRET").context("ACCESS_TOKEN_SECRET must be set")?;

        let mongodb_uri = match var("MONGODB_URI") {
            Some(uri) => uri,
            None => {
                let user = var("DB_USER").context("DB_USER must be set when MONGODB_URI is not")?;
                let pass = var("DB_PASS").context("DB_PASS must be set when MONGODB_URI is not")?;
                let host = var("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
                atlas_uri(&user, &pass, &host)
            }
        };
        let database_name = var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let jwt_leeway_seconds = var("JWT_LEEWAY_SECONDS")
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(30);
        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            access_token_secret,
            mongodb_uri,
            database_name,
            jwt_leeway_seconds,
            cors_allowed_origins,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.access_token_secret.clone()).with_leeway(self.jwt_leeway_seconds)
    }

    /// Any origin unless an explicit list is configured.
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.cors_allowed_origins.is_empty() {
            return Ok(layer.allow_origin(Any));
        }

        let origins = self
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|err| anyhow!("Invalid CORS origin '{origin}': {err}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(layer.allow_origin(AllowOrigin::list(origins)))
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("addr", &self.socket_addr())
            .field("database_name", &self.database_name)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

fn atlas_uri(user: &str, pass: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        urlencoding::encode(user),
        urlencoding::encode(pass),
        host
    )
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(normalize_optional)
        .collect()
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
