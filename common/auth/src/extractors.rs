use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::verifier::JwtVerifier;

/// Caller whose `Authorization: Bearer <jwt>` header verified against the
/// shared secret. Taking this extractor is what makes a route protected.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = Arc::<JwtVerifier>::from_ref(state).verify(token)?;
        Ok(Self { claims })
    }
}

/// Token half of the header. The scheme must be exactly `Bearer`.
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?;

    match value.trim().split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidAuthorization),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JwtConfig, TokenSigner};
    use axum::http::{HeaderValue, Request};
    use serde_json::json;

    const SECRET: &str = "extractor-secret";

    fn headers_with(value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        headers
    }

    fn parts_with(authorization: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/myCartTickets");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let headers = headers_with(HeaderValue::from_static("  Bearer   abc.def.ghi "));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn absent_header_is_missing_not_malformed() {
        let err = bearer_token(&HeaderMap::new()).expect_err("no header");
        assert!(matches!(err, AuthError::MissingAuthorization));
    }

    #[test]
    fn other_schemes_and_bare_bearer_are_malformed() {
        for raw in ["Token abc.def.ghi", "bearer abc.def.ghi", "Bearer", "Bearer    ", "abc.def.ghi"] {
            let headers = headers_with(HeaderValue::from_static(raw));
            let err = bearer_token(&headers).expect_err(raw);
            assert!(matches!(err, AuthError::InvalidAuthorization), "{raw}");
        }
    }

    #[test]
    fn non_utf8_header_is_malformed() {
        let headers = headers_with(HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        let err = bearer_token(&headers).expect_err("opaque bytes");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[tokio::test]
    async fn extractor_yields_caller_email() {
        let config = JwtConfig::new(SECRET);
        let verifier = Arc::new(JwtVerifier::new(config.clone()));
        let serde_json::Value::Object(identity) = json!({"email": "fan@example.com"}) else { unreachable!() };
        let issued = TokenSigner::new(config).issue(identity).unwrap();

        let mut parts = parts_with(Some(format!("Bearer {}", issued.token)));
        let auth = AuthContext::from_request_parts(&mut parts, &verifier).await.unwrap();
        assert_eq!(auth.email(), "fan@example.com");
    }

    #[tokio::test]
    async fn extractor_rejects_token_from_another_secret() {
        let verifier = Arc::new(JwtVerifier::new(JwtConfig::new(SECRET)));
        let serde_json::Value::Object(identity) = json!({"email": "fan@example.com"}) else { unreachable!() };
        let issued = TokenSigner::new(JwtConfig::new("other-secret")).issue(identity).unwrap();

        let mut parts = parts_with(Some(format!("Bearer {}", issued.token)));
        let err = AuthContext::from_request_parts(&mut parts, &verifier)
            .await
            .expect_err("foreign signature");
        assert!(matches!(err, AuthError::Verification(_)));

        let mut parts = parts_with(None);
        let err = AuthContext::from_request_parts(&mut parts, &verifier)
            .await
            .expect_err("no header");
        assert!(matches!(err, AuthError::MissingAuthorization));
    }
}
