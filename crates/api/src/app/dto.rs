use serde::{Deserialize, Serialize};

use warden_auth::TokenPair;

use crate::app::catalog::{NewProduct, ProductAttrs, ProductChanges, ProductStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RenewRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub attrs: ProductAttrs,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<ProductStatus>,
    pub attrs: Option<ProductAttrs>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(value: CreateProductRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            attrs: value.attrs,
        }
    }
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(value: UpdateProductRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            status: value.status,
            attrs: value.attrs,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub tokens: TokenPair,
}
