use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::identitydb::IdentityExt,
    dtos::{
        authdtos::{LoginDto, LoginResponseDto, SessionIdentityDto, SignupDto},
        dispatchdtos::ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddleware},
    service::error::ServiceError,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session).layer(middleware::from_fn(auth)))
}

pub async fn signup(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SignupDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_identity(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::EmailExist.to_string(),
        ));
    }

    let hashed_password = password::hash(&body.password).map_err(|e| match e {
        ErrorMessage::ExceededMaxPasswordLength(_) => HttpError::bad_request(e.to_string()),
        _ => HttpError::server_error(e.to_string()),
    })?;

    let identity = app_state
        .db_client
        .save_identity(&body.email, &hashed_password, body.role)
        .await
        .map_err(|e| match ServiceError::from(e) {
            ServiceError::Conflict(_) => {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            }
            other => HttpError::from(other),
        })?;

    tracing::info!("identity {} signed up as {}", identity.id, body.role);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Account created successfully",
            SessionIdentityDto {
                id: identity.id,
                email: identity.email,
            },
        )),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let identity = app_state
        .db_client
        .get_identity(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &identity.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    let token = token::create_token(
        &identity.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    let mut response = Json(LoginResponseDto {
        status: "success".to_string(),
        token,
        identity: SessionIdentityDto {
            id: identity.id,
            email: identity.email,
        },
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

/// Drops the session cookie. Bearer tokens simply expire.
pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    let mut response = Json(ApiResponse::success("Logged out", ())).into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

/// The caller behind the current token, with `role: null` while no profile exists.
pub async fn session(
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(ApiResponse::success("Session resolved", auth.caller)))
}
