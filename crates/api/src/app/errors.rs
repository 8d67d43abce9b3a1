use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use warden_auth::AuthError;
use warden_core::ProductId;

use crate::app::catalog::CatalogError;

/// Map a session/authorization failure to its HTTP response.
///
/// `Malformed` and `SignatureInvalid` share one response so callers cannot
/// probe which check failed.
pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::Malformed | AuthError::SignatureInvalid | AuthError::Unauthorized => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_token", "token is invalid")
        }
        AuthError::Expired => json_error(
            StatusCode::UNAUTHORIZED,
            "token_expired",
            "access token has expired; renew the session",
        ),
        AuthError::SessionExpired => json_error(
            StatusCode::UNAUTHORIZED,
            "session_expired",
            "session has expired; sign in again",
        ),
        AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        AuthError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        AuthError::UsernameTaken(_) => json_error(StatusCode::CONFLICT, "username_taken", err.to_string()),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
        AuthError::UnknownRole(_) => {
            tracing::error!(error = %err, "account carries an unknown role");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "unknown_role",
                "account role is not recognised",
            )
        }
        AuthError::StoreUnavailable(_) | AuthError::DirectoryUnavailable(_) => {
            tracing::warn!(error = %err, "auth backend unavailable");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "authentication backend unavailable; retry later",
            )
        }
        AuthError::SigningFailure(_) | AuthError::Hashing(_) => {
            tracing::error!(error = %err, "internal auth failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        CatalogError::NotOwner(_) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        CatalogError::Validation(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        CatalogError::Poisoned => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_product_id(s: &str) -> Result<ProductId, axum::response::Response> {
    s.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_auth::Capability;

    #[test]
    fn token_failures_share_one_response() {
        let malformed = auth_error_to_response(&AuthError::Malformed);
        let forged = auth_error_to_response(&AuthError::SignatureInvalid);
        assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (AuthError::Expired, StatusCode::UNAUTHORIZED),
            (AuthError::SessionExpired, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden(Capability::ProductDelete), StatusCode::FORBIDDEN),
            (AuthError::UsernameTaken("a".into()), StatusCode::CONFLICT),
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::UnknownRole("root".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AuthError::DirectoryUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(auth_error_to_response(&err).status(), status, "{err:?}");
        }
    }

    #[test]
    fn bad_product_id_is_bad_request() {
        assert_eq!(
            parse_product_id("nope").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
