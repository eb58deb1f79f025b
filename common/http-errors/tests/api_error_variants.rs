use axum::http::StatusCode;
use axum::response::IntoResponse;
use common_http_errors::ApiError;

#[test]
fn forbidden_missing_role_variant() {
    let resp = ApiError::ForbiddenMissingRole { role: "admin" }.into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_role");
}

#[test]
fn method_not_allowed_variant() {
    let resp = ApiError::MethodNotAllowed.into_response();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "method_not_allowed");
}

#[test]
fn bad_request_variant() {
    let resp = ApiError::bad_request("invalid_id", "'x' is not a valid id").into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "invalid_id");
}

#[test]
fn not_found_variant() {
    let resp = ApiError::NotFound { code: "route_not_found" }.into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "route_not_found");
}

#[test]
fn internal_variant() {
    let resp = ApiError::internal("boom").into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "internal_error");
}
