//! Access to the products/orders REST backend.
//!
//! [`Backend`] is the seam every form and list view talks through.
//! [`HttpBackend`] speaks the real wire protocol; [`MemoryBackend`] keeps records
//! in resource actors for offline use and tests.

mod http;
mod memory;

pub use http::*;
pub use memory::*;

use crate::domain::{Order, OrderCreate, OrderId, OrderUpdate, Product, ProductCreate, ProductId};
use crate::error::ApiError;
use async_trait::async_trait;
use serde::Deserialize;

/// Response wrapper used by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwraps the payload, treating an explicit `success: false` as a rejection.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(self.message));
        }
        Ok(self.data)
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn create_product(&self, product: ProductCreate) -> Result<(), ApiError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;
    async fn show_order(&self, id: &OrderId) -> Result<Order, ApiError>;
    async fn create_order(&self, order: OrderCreate) -> Result<(), ApiError>;
    async fn update_order(&self, id: &OrderId, order: OrderUpdate) -> Result<(), ApiError>;
    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError>;
}
