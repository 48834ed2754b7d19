use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dtos::dispatchdtos::{ApiResponse, UpdateRoleDto},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::profilemodel::Role,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", delete(delete_user))
        .route("/profiles/:profile_id/role", put(update_profile_role))
        .layer(middleware::from_fn(|req, next| {
            role_check(req, next, vec![Role::Admin])
        }))
}

pub async fn list_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state.admin_service.list_users(&auth.caller).await?;

    Ok(Json(ApiResponse::success("Users retrieved successfully", users)))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .admin_service
        .delete_user(&auth.caller, user_id)
        .await?;

    Ok(Json(ApiResponse::success("User deleted successfully", json!({ "id": user_id }))))
}

pub async fn update_profile_role(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<UpdateRoleDto>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .admin_service
        .update_role(&auth.caller, profile_id, body.role)
        .await?;

    Ok(Json(ApiResponse::success("Role updated successfully", profile)))
}
