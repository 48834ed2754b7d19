use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::{identitydb::IdentityExt, profiledb::ProfileExt},
    error::{ErrorMessage, HttpError},
    models::profilemodel::Role,
    service::access_policy::Caller,
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddleware {
    pub caller: Caller,
}

/// Resolves the bearer of the `token` cookie or `Authorization: Bearer` header.
/// A caller whose profile row does not exist yet is let through with no role.
pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(str::to_owned)
        })
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let token_details = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let identity_id = uuid::Uuid::parse_str(&token_details)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let identity = app_state
        .db_client
        .get_identity(Some(identity_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    let profile = app_state
        .db_client
        .get_profile(identity.id, identity.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if profile.is_none() {
        tracing::debug!("identity {} has no profile yet", identity.id);
    }

    req.extensions_mut().insert(JWTAuthMiddleware {
        caller: Caller {
            id: identity.id,
            email: identity.email,
            role: profile.map(|profile| profile.role),
        },
    });

    Ok(next.run(req).await)
}

pub async fn role_check(
    req: Request,
    next: Next,
    required_roles: Vec<Role>,
) -> Result<impl IntoResponse, HttpError> {
    let auth = req
        .extensions()
        .get::<JWTAuthMiddleware>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    let permitted = auth
        .caller
        .role
        .map(|role| required_roles.contains(&role))
        .unwrap_or(false);

    if !permitted {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(next.run(req).await)
}
