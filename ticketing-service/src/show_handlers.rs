use axum::{extract::State, Json};
use common_auth::{AdminContext, AuthContext};
use common_http_errors::{ApiError, ApiResult};
use tracing::info;

use crate::extract::{parse_object_id, ApiPath, JsonBody};
use crate::store::{Collection, DeleteResult, Document, Filter, InsertOneResult, UpdateResult, ID_FIELD};
use crate::AppState;

/// Fields returned by the public show listing.
pub const SHOW_LIST_PROJECTION: &[&str] = &[ID_FIELD, "bandName", "date", "img", "time", "stage"];

pub async fn list_shows(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    let shows = state
        .store
        .find(Collection::Shows, Filter::All, Some(SHOW_LIST_PROJECTION))
        .await?;
    Ok(Json(shows))
}

/// Returns a one-element array, or an empty one when the id is unknown.
pub async fn get_show(
    State(state): State<AppState>,
    _auth: AuthContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let id = parse_object_id(&id)?;
    let shows = state.store.find(Collection::Shows, Filter::Id(id), None).await?;
    Ok(Json(shows))
}

pub async fn update_show(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    ApiPath(id): ApiPath<String>,
    JsonBody(mut fields): JsonBody,
) -> ApiResult<Json<UpdateResult>> {
    let id = parse_object_id(&id)?;
    // the path decides which document is written
    fields.remove(ID_FIELD);
    if fields.is_empty() {
        return Err(ApiError::bad_request("empty_update", "no fields to update"));
    }

    let result = state
        .store
        .update_one(Collection::Shows, Filter::Id(id), fields, true)
        .await?;
    info!(by = %admin.email(), show_id = %id, upserted = result.upserted_count, "show updated");
    Ok(Json(result))
}

pub async fn delete_show(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    let result = state.store.delete_one(Collection::Shows, Filter::Id(id)).await?;
    info!(by = %auth.email(), show_id = %id, deleted = result.deleted_count, "show deleted");
    Ok(Json(result))
}

pub async fn create_show(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    JsonBody(show): JsonBody,
) -> ApiResult<Json<InsertOneResult>> {
    let result = state.store.insert_one(Collection::Shows, show).await?;
    info!(by = %admin.email(), show_id = %result.inserted_id, "show created");
    Ok(Json(result))
}
