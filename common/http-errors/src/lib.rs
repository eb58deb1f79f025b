use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden access";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub missing_role: Option<String>,
    pub message: String,
}

/// Every failure a route can produce. Handlers and extractors return this so
/// clients always see the same `{code, message}` shape and `X-Error-Code` header.
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated { code: &'static str },
    ForbiddenMissingRole { role: &'static str },
    BadRequest { code: &'static str, message: Option<String> },
    NotFound { code: &'static str },
    MethodNotAllowed,
    StoreFailure { message: Option<String> },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self { Self::Internal { message: Some(e.to_string()) } }
    pub fn store_failure<E: std::fmt::Display>(e: E) -> Self { Self::StoreFailure { message: Some(e.to_string()) } }
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self { Self::BadRequest { code, message: Some(message.into()) } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ForbiddenMissingRole { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::StoreFailure { .. } | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (body, error_code) = match self {
            ApiError::Unauthenticated { code } => (
                ErrorBody { code: code.into(), missing_role: None, message: UNAUTHORIZED_MESSAGE.into() },
                code
            ),
            ApiError::ForbiddenMissingRole { role } => (
                ErrorBody { code: "missing_role".into(), missing_role: Some(role.into()), message: FORBIDDEN_MESSAGE.into() },
                "missing_role"
            ),
            ApiError::BadRequest { code, message } => (
                ErrorBody { code: code.into(), missing_role: None, message: message.unwrap_or_else(|| "Bad request".into()) },
                code
            ),
            ApiError::NotFound { code } => (
                ErrorBody { code: code.into(), missing_role: None, message: "Not found".into() },
                code
            ),
            ApiError::MethodNotAllowed => (
                ErrorBody { code: "method_not_allowed".into(), missing_role: None, message: "Method not allowed".into() },
                "method_not_allowed"
            ),
            ApiError::StoreFailure { message } => (
                ErrorBody { code: "store_failure".into(), missing_role: None, message: message.unwrap_or_else(|| "Store operation failed".into()) },
                "store_failure"
            ),
            ApiError::Internal { message } => (
                ErrorBody { code: "internal_error".into(), missing_role: None, message: message.unwrap_or_else(|| "Internal error".into()) },
                "internal_error"
            ),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
