use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dtos::dispatchdtos::{
        ApiResponse, AssignContractorDto, CreateJobDto, JobFilterDto, UpdateJobDto,
        UpdateJobStatusDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::profilemodel::Role,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(list_jobs).merge(post(create_job).layer(middleware::from_fn(|req, next| {
                role_check(req, next, vec![Role::PropertyManager, Role::Admin])
            }))),
        )
        .route(
            "/:job_id",
            get(get_job)
                .merge(patch(update_job))
                .merge(axum::routing::delete(delete_job).layer(middleware::from_fn(
                    |req, next| role_check(req, next, vec![Role::Admin]),
                ))),
        )
        .route(
            "/:job_id/assign",
            put(assign_contractor).layer(middleware::from_fn(|req, next| {
                role_check(req, next, vec![Role::PropertyManager, Role::Admin])
            })),
        )
        .route("/:job_id/status", patch(update_job_status))
}

pub async fn list_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(filter): Query<JobFilterDto>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .list_jobs(&auth.caller, &filter)
        .await?;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(&auth.caller, job_id).await?;

    Ok(Json(ApiResponse::success("Job retrieved successfully", job)))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.create_job(&auth.caller, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Job created successfully", job)),
    ))
}

pub async fn assign_contractor(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<i64>,
    Json(body): Json<AssignContractorDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .assign_contractor(&auth.caller, job_id, body.contractor_id)
        .await?;

    Ok(Json(ApiResponse::success("Contractor assigned successfully", job)))
}

pub async fn update_job_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<i64>,
    Json(body): Json<UpdateJobStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .update_job_status(&auth.caller, job_id, body.status)
        .await?;

    Ok(Json(ApiResponse::success("Job status updated successfully", job)))
}

pub async fn update_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<i64>,
    Json(body): Json<UpdateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .update_job(&auth.caller, job_id, body)
        .await?;

    Ok(Json(ApiResponse::success("Job updated successfully", job)))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.job_service.delete_job(&auth.caller, job_id).await?;

    Ok(Json(ApiResponse::success("Job deleted successfully", json!({ "id": job_id }))))
}
