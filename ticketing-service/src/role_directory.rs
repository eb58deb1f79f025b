use std::sync::Arc;

use async_trait::async_trait;
use common_auth::{AuthError, AuthResult, RoleDirectory};
use serde_json::Value;

use crate::store::{Collection, DocumentStore, Filter};

/// Reads the `role` field of the user document keyed by email.
pub struct UserRoleDirectory {
    store: Arc<dyn DocumentStore>,
}

impl UserRoleDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleDirectory for UserRoleDirectory {
    async fn role_for(&self, email: &str) -> AuthResult<Option<String>> {
        let user = self
            .store
            .find_one(Collection::Users, Filter::field("email", email))
            .await
            .map_err(|err| AuthError::RoleLookup(err.to_string()))?;

        Ok(user.and_then(|doc| match doc.get("role") {
            Some(Value::String(role)) => Some(role.clone()),
            _ => None,
        }))
    }
}
