use axum::{extract::State, Json};
use common_auth::AuthContext;
use common_http_errors::ApiResult;
use serde::Deserialize;
use tracing::debug;

use crate::extract::{parse_object_id, ApiPath, ApiQuery, JsonBody};
use crate::store::{Collection, DeleteResult, Document, Filter, InsertOneResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CartTicketQuery {
    #[serde(default)]
    pub email: Option<String>,
}

pub async fn add_cart_ticket(
    State(state): State<AppState>,
    _auth: AuthContext,
    JsonBody(ticket): JsonBody,
) -> ApiResult<Json<InsertOneResult>> {
    let result = state.store.insert_one(Collection::CartTickets, ticket).await?;
    Ok(Json(result))
}

/// Lists every cart ticket, or only those stored under `?email=`.
pub async fn list_cart_tickets(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(params): ApiQuery<CartTicketQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = match params.email.filter(|email| !email.is_empty()) {
        Some(email) => Filter::field("email", email),
        None => Filter::All,
    };
    debug!(caller = %auth.email(), ?filter, "listing cart tickets");

    let tickets = state.store.find(Collection::CartTickets, filter, None).await?;
    Ok(Json(tickets))
}

pub async fn delete_cart_ticket(
    State(state): State<AppState>,
    _auth: AuthContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    let result = state.store.delete_one(Collection::CartTickets, Filter::Id(id)).await?;
    Ok(Json(result))
}
