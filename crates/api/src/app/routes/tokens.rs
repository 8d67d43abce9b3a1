use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::extract_bearer;

/// Exchange the (possibly expired) bearer access token plus the body's
/// refresh token for a new pair.
pub async fn renew(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::RenewRequest>,
) -> axum::response::Response {
    let access = match extract_bearer(&headers) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match services.sessions.renew(access, &body.refresh_token).await {
        Ok(tokens) => (StatusCode::OK, Json(dto::TokensResponse { tokens })).into_response(),
        Err(e) => errors::auth_error_to_response(&e),
    }
}
