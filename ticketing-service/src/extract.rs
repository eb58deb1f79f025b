use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use bson::oid::ObjectId;
use common_http_errors::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use crate::store::{Document, StoreError};

/// JSON object request body. Non-JSON or non-object bodies become a 400 in the
/// shared error shape instead of axum's plain-text rejection.
pub struct JsonBody(pub Document);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_body", rejection.body_text()))?;

        match value {
            Value::Object(document) => Ok(JsonBody(document)),
            _ => Err(ApiError::bad_request("invalid_body", "expected a JSON object")),
        }
    }
}

/// `Path` whose rejection is a 400 `invalid_path` in the shared error shape.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_path", rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}

/// `Query` whose rejection is a 400 `invalid_query` in the shared error shape.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_query", rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

pub fn parse_object_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request("invalid_id", format!("'{raw}' is not a valid id")))
}

/// Non-empty string field, e.g. the `email` every identity must carry.
pub fn required_str<'a>(document: &'a Document, field: &'static str) -> Result<&'a str, ApiError> {
    match document.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.as_str()),
        _ => Err(ApiError::bad_request("missing_field", format!("'{field}' is required"))),
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // the posted document cannot be stored as sent
            StoreError::Conversion(message) => {
                warn!(%message, "document rejected by store");
                ApiError::bad_request("invalid_body", message)
            }
            err => {
                error!(?err, "store operation failed");
                ApiError::store_failure(err)
            }
        }
    }
}
