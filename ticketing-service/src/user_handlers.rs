use axum::{extract::State, Json};
use common_auth::{AdminContext, AuthContext, ROLE_ADMIN};
use common_http_errors::ApiResult;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::extract::{parse_object_id, required_str, ApiPath, JsonBody};
use crate::store::{Collection, DeleteResult, Document, Filter, InsertOneResult, UpdateResult};
use crate::AppState;

pub const USER_EXISTS_MESSAGE: &str = "user already exists";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Inserted(InsertOneResult),
    AlreadyExists {
        message: &'static str,
        #[serde(rename = "insertedId")]
        inserted_id: Option<String>,
    },
}

/// Stores the posted user unless a document with the same email exists.
pub async fn create_user(
    State(state): State<AppState>,
    _auth: AuthContext,
    JsonBody(user): JsonBody,
) -> ApiResult<Json<CreateUserResponse>> {
    let email = required_str(&user, "email")?.to_string();

    let existing = state
        .store
        .find_one(Collection::Users, Filter::field("email", email.as_str()))
        .await?;
    if existing.is_some() {
        return Ok(Json(CreateUserResponse::AlreadyExists {
            message: USER_EXISTS_MESSAGE,
            inserted_id: None,
        }));
    }

    let result = state.store.insert_one(Collection::Users, user).await?;
    info!(%email, id = %result.inserted_id, "user created");
    Ok(Json(CreateUserResponse::Inserted(result)))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> ApiResult<Json<Vec<Document>>> {
    let users = state.store.find(Collection::Users, Filter::All, None).await?;
    Ok(Json(users))
}

pub async fn user_role(
    State(state): State<AppState>,
    _auth: AuthContext,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let users = state
        .store
        .find(Collection::Users, Filter::field("email", email), None)
        .await?;
    Ok(Json(users))
}

pub async fn make_admin(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<UpdateResult>> {
    let id = parse_object_id(&id)?;
    let mut fields = Document::new();
    fields.insert("role".to_string(), Value::from(ROLE_ADMIN));

    let result = state
        .store
        .update_one(Collection::Users, Filter::Id(id), fields, false)
        .await?;
    info!(granted_by = %admin.email(), user_id = %id, matched = result.matched_count, "admin role granted");
    Ok(Json(result))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminContext(admin): AdminContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    let result = state.store.delete_one(Collection::Users, Filter::Id(id)).await?;
    info!(deleted_by = %admin.email(), user_id = %id, deleted = result.deleted_count, "user deleted");
    Ok(Json(result))
}
