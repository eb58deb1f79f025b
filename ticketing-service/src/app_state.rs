use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::{JwtConfig, JwtVerifier, RoleDirectory, TokenSigner};

use crate::role_directory::UserRoleDirectory;
use crate::store::DocumentStore;

/// Shared application state used by handlers and the auth extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub jwt_verifier: Arc<JwtVerifier>,
    pub token_signer: Arc<TokenSigner>,
    pub role_directory: Arc<dyn RoleDirectory>,
}

impl AppState {
    /// Wires the signer, verifier and role directory around one store handle.
    pub fn new(store: Arc<dyn DocumentStore>, jwt: JwtConfig) -> Self {
        let role_directory = Arc::new(UserRoleDirectory::new(store.clone()));
        Self {
            store,
            jwt_verifier: Arc::new(JwtVerifier::new(jwt.clone())),
            token_signer: Arc::new(TokenSigner::new(jwt)),
            role_directory,
        }
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self { state.jwt_verifier.clone() }
}

impl FromRef<AppState> for Arc<dyn RoleDirectory> {
    fn from_ref(state: &AppState) -> Self { state.role_directory.clone() }
}
