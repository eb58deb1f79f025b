use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use common_http_errors::ApiError;
use tracing::warn;

use crate::error::AuthResult;
use crate::roles::ROLE_ADMIN;
use crate::verifier::JwtVerifier;
use crate::AuthContext;

/// Source of truth for the role stored against a user's email.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// `Ok(None)` when the user is unknown or has no role.
    async fn role_for(&self, email: &str) -> AuthResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    Forbidden { required: &'static str },
}

impl From<GuardError> for ApiError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::Forbidden { required } => ApiError::ForbiddenMissingRole { role: required },
        }
    }
}

pub fn ensure_role(stored: Option<&str>, required: &'static str) -> Result<(), GuardError> {
    match stored {
        Some(role) if role == required => Ok(()),
        _ => Err(GuardError::Forbidden { required }),
    }
}

/// Verified caller whose stored role is the admin sentinel.
///
/// Runs the [`AuthContext`] extractor first, so a missing or bad token is still
/// a 401; only an authenticated non-admin gets the 403.
#[derive(Debug, Clone)]
pub struct AdminContext(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AdminContext
where
    Arc<JwtVerifier>: FromRef<S>,
    Arc<dyn RoleDirectory>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        let directory = Arc::<dyn RoleDirectory>::from_ref(state);

        let role = directory.role_for(auth.email()).await?;
        if let Err(err) = ensure_role(role.as_deref(), ROLE_ADMIN) {
            warn!(email = %auth.email(), ?role, "role_check_failed");
            return Err(err.into());
        }

        Ok(Self(auth))
    }
}
