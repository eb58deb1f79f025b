use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use common_http_errors::{ApiError, ApiResult};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cart_handlers::{add_cart_ticket, delete_cart_ticket, list_cart_tickets};
use crate::show_handlers::{create_show, delete_show, get_show, list_shows, update_show};
use crate::token_handlers::issue_token;
use crate::user_handlers::{create_user, delete_user, list_users, make_admin, user_role};
use crate::AppState;

pub const ROOT_BANNER: &str = "Server is running ......";

async fn root() -> &'static str {
    ROOT_BANNER
}

async fn health() -> &'static str {
    "ok"
}

async fn route_not_found() -> ApiResult<()> {
    Err(ApiError::NotFound { code: "route_not_found" })
}

async fn method_not_allowed() -> ApiResult<()> {
    Err(ApiError::MethodNotAllowed)
}

/// Full route table. Which extractor a handler takes decides its guard:
/// `AuthContext` verifies the bearer token, `AdminContext` additionally
/// requires the stored admin role.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(health))
        .route("/jwt", post(issue_token))
        .route("/users", post(create_user).get(list_users))
        .route("/user-role/:email", get(user_role))
        .route("/users/make-admin/:id", patch(make_admin))
        .route("/users/:id", delete(delete_user))
        .route("/shows", get(list_shows).post(create_show))
        .route(
            "/shows/:id",
            get(get_show).put(update_show).delete(delete_show),
        )
        .route("/cartTickets", post(add_cart_ticket))
        .route("/myCartTickets", get(list_cart_tickets))
        .route("/cartTickets/:id", delete(delete_cart_ticket))
        // only covers the routes registered above
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
