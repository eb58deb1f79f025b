use axum::response::{IntoResponse, Response};
use common_http_errors::ApiError;
use thiserror::Error;
use tracing::debug;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to decode token header: {0}")]
    InvalidHeader(String),
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("role lookup failed: {0}")]
    RoleLookup(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Verification(value.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match &value {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => {
                debug!(error = %value, "rejecting request");
                ApiError::Unauthenticated { code: "auth_header" }
            }
            AuthError::InvalidHeader(_) | AuthError::Verification(_) => {
                debug!(error = %value, "rejecting request");
                ApiError::Unauthenticated { code: "auth_token" }
            }
            AuthError::InvalidClaim(_, _) | AuthError::InvalidJson(_) => {
                debug!(error = %value, "rejecting request");
                ApiError::Unauthenticated { code: "auth_claims" }
            }
            AuthError::Signing(_) => ApiError::internal(value),
            AuthError::RoleLookup(_) => ApiError::store_failure(value),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn verification_failures_are_unauthenticated() {
        for err in [
            AuthError::MissingAuthorization,
            AuthError::InvalidAuthorization,
            AuthError::Verification("ExpiredSignature".into()),
            AuthError::InvalidJson("missing field `email`".into()),
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn role_lookup_failure_is_a_store_failure() {
        let api = ApiError::from(AuthError::RoleLookup("timeout".into()));
        assert!(matches!(api, ApiError::StoreFailure { .. }));
    }
}
