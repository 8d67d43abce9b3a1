//! In-memory product catalogue.
//!
//! Products are owned by the subject that created them; only the owner may
//! change or remove one. Capability checks happen in the handlers before any
//! catalogue call.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{DomainError, ProductId, SubjectId, error::require_text};

const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProductAttrs {
    pub picture: String,
    pub description: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub owner: SubjectId,
    pub title: String,
    pub author: String,
    pub status: ProductStatus,
    pub attrs: ProductAttrs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub title: String,
    pub author: String,
    pub attrs: ProductAttrs,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<ProductStatus>,
    pub attrs: Option<ProductAttrs>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("product {0} belongs to another subject")]
    NotOwner(ProductId),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("catalogue lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        owner: SubjectId,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product, CatalogError> {
        require_text("title", &input.title, MAX_TEXT_LEN)?;
        require_text("author", &input.author, MAX_TEXT_LEN)?;

        let product = Product {
            id: ProductId::new(),
            owner,
            title: input.title,
            author: input.author,
            status: ProductStatus::Active,
            attrs: input.attrs,
            created_at: now,
            updated_at: now,
        };

        let mut products = self.products.write().map_err(|_| CatalogError::Poisoned)?;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.products.read().map_err(|_| CatalogError::Poisoned)?;
        Ok(products.values().cloned().collect())
    }

    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        let products = self.products.read().map_err(|_| CatalogError::Poisoned)?;
        products.get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }

    pub fn update(
        &self,
        id: ProductId,
        actor: SubjectId,
        changes: ProductChanges,
        now: DateTime<Utc>,
    ) -> Result<Product, CatalogError> {
        if let Some(title) = &changes.title {
            require_text("title", title, MAX_TEXT_LEN)?;
        }
        if let Some(author) = &changes.author {
            require_text("author", author, MAX_TEXT_LEN)?;
        }

        let mut products = self.products.write().map_err(|_| CatalogError::Poisoned)?;
        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        if product.owner != actor {
            return Err(CatalogError::NotOwner(id));
        }

        if let Some(title) = changes.title {
            product.title = title;
        }
        if let Some(author) = changes.author {
            product.author = author;
        }
        if let Some(status) = changes.status {
            product.status = status;
        }
        if let Some(attrs) = changes.attrs {
            product.attrs = attrs;
        }
        product.updated_at = now;

        Ok(product.clone())
    }

    pub fn delete(&self, id: ProductId, actor: SubjectId) -> Result<Product, CatalogError> {
        let mut products = self.products.write().map_err(|_| CatalogError::Poisoned)?;
        match products.get(&id) {
            None => Err(CatalogError::NotFound(id)),
            Some(p) if p.owner != actor => Err(CatalogError::NotOwner(id)),
            Some(_) => products.remove(&id).ok_or(CatalogError::NotFound(id)),
        }
    }
}
