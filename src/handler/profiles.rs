use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    db::profiledb::ProfileExt,
    dtos::dispatchdtos::ApiResponse,
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn profiles_handler() -> Router {
    Router::new().route("/me", get(get_my_profile))
}

/// Returns `data: null` when the profile has not been provisioned yet; that is
/// a normal transient state, not an error.
pub async fn get_my_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_profile(auth.caller.id, auth.caller.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Profile retrieved successfully", profile)))
}
