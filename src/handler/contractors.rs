use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dtos::dispatchdtos::{ApiResponse, CreateContractorDto, UpdateContractorDto},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::profilemodel::Role,
    AppState,
};

pub fn contractors_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(list_contractors).merge(post(create_contractor).layer(middleware::from_fn(
                |req, next| role_check(req, next, vec![Role::PropertyManager, Role::Admin]),
            ))),
        )
        .route("/me", get(get_my_contractor))
        .route(
            "/:contractor_id",
            patch(update_contractor)
                .layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![Role::PropertyManager, Role::Admin])
                }))
                .merge(delete(delete_contractor).layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![Role::Admin])
                }))),
        )
}

pub async fn list_contractors(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contractors = app_state
        .contractor_service
        .list_contractors(&auth.caller)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contractors retrieved successfully",
        contractors,
    )))
}

pub async fn get_my_contractor(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contractor = app_state
        .contractor_service
        .my_contractor(&auth.caller)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contractor record retrieved successfully",
        contractor,
    )))
}

pub async fn create_contractor(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateContractorDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contractor = app_state
        .contractor_service
        .create_contractor(&auth.caller, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Contractor created successfully", contractor)),
    ))
}

pub async fn update_contractor(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(contractor_id): Path<i64>,
    Json(body): Json<UpdateContractorDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contractor = app_state
        .contractor_service
        .update_contractor(&auth.caller, contractor_id, body)
        .await?;

    Ok(Json(ApiResponse::success("Contractor updated successfully", contractor)))
}

pub async fn delete_contractor(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(contractor_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .contractor_service
        .delete_contractor(&auth.caller, contractor_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contractor deleted successfully",
        json!({ "id": contractor_id }),
    )))
}
