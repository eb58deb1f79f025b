use axum::{extract::State, Json};
use common_http_errors::{ApiError, ApiResult};
use serde::Serialize;
use tracing::info;

use crate::extract::{required_str, JsonBody};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Signs whatever identity the client posts, as long as it names an email.
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(identity): JsonBody,
) -> ApiResult<Json<TokenResponse>> {
    let email = required_str(&identity, "email")?.to_string();
    let issued = state.token_signer.issue(identity).map_err(ApiError::from)?;
    info!(%email, expires_at = %issued.expires_at, "token issued");
    Ok(Json(TokenResponse { token: issued.token }))
}
