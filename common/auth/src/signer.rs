use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

pub struct TokenSigner {
    config: JwtConfig,
    key: EncodingKey,
}

pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenSigner {
    pub fn new(config: JwtConfig) -> Self {
        let key = EncodingKey::from_secret(config.secret.as_bytes());
        Self { config, key }
    }

    /// Signs the posted identity as-is; `iat` and `exp` are always set here and
    /// override any caller-supplied values.
    pub fn issue(&self, identity: Map<String, Value>) -> AuthResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::days(self.config.token_ttl_days);

        let mut claims = identity;
        claims.insert("iat".to_string(), Value::from(issued_at.timestamp()));
        claims.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        let token = encode(&Header::new(Algorithm::HS256), &Value::Object(claims), &self.key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}
