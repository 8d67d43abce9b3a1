use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use warden_auth::Capability;
use warden_core::Clock;

use crate::app::{dto, errors, services::AppServices};
use crate::authz::require_capability;
use crate::context::SubjectContext;

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products.list() {
        Ok(products) => Json(serde_json::json!({
            "count": products.len(),
            "products": products,
        }))
        .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.get(id) {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&subject, Capability::ProductCreate) {
        return resp;
    }

    let now = services.clock.now();
    match services.products.create(subject.subject_id(), body.into(), now) {
        Ok(product) => {
            tracing::info!(product = %product.id, subject = %subject.subject_id(), "product created");
            (StatusCode::CREATED, Json(product)).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&subject, Capability::ProductUpdate) {
        return resp;
    }
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let now = services.clock.now();
    match services.products.update(id, subject.subject_id(), body.into(), now) {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<SubjectContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&subject, Capability::ProductDelete) {
        return resp;
    }
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.delete(id, subject.subject_id()) {
        Ok(product) => {
            tracing::info!(product = %product.id, subject = %subject.subject_id(), "product deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}
