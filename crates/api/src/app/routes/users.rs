use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use warden_auth::Role;

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::extract_bearer;

/// Self-service registration always yields a plain `user` account.
pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services
        .sessions
        .sign_up(&body.username, &body.password, Role::User)
        .await
    {
        Ok(subject) => (StatusCode::CREATED, Json(subject)).into_response(),
        Err(e) => errors::auth_error_to_response(&e),
    }
}

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services.sessions.sign_in(&body.username, &body.password).await {
        Ok(tokens) => (StatusCode::OK, Json(dto::TokensResponse { tokens })).into_response(),
        Err(e) => errors::auth_error_to_response(&e),
    }
}

pub async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = match extract_bearer(&headers) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match services.sessions.sign_out(token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(&e),
    }
}
