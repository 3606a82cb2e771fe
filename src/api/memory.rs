use super::Backend;
use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::domain::{
    Order, OrderCreate, OrderId, OrderUpdate, Product, ProductCreate, ProductId, ProductPatch,
};
use crate::error::ApiError;
use crate::order_actor::{NewOrder, OrderRevision};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// In-process backend keeping products and orders in two resource actors.
///
/// Records vanish with the process. Used by the `demo` command and by tests.
#[derive(Clone)]
pub struct MemoryBackend {
    products: ResourceClient<Product>,
    orders: ResourceClient<Order>,
}

impl MemoryBackend {
    /// Wraps existing resource clients (real actors or mocks).
    pub fn new(products: ResourceClient<Product>, orders: ResourceClient<Order>) -> Self {
        Self { products, orders }
    }

    /// Starts both actors and returns the backend with their task handles.
    ///
    /// The actors stop once every clone of the backend is dropped.
    pub fn spawn(buffer_size: usize) -> (Self, Vec<JoinHandle<()>>) {
        let product_counter = Arc::new(AtomicU32::new(1));
        let next_product_id = move || ProductId(product_counter.fetch_add(1, Ordering::SeqCst));
        let (product_actor, products) = ResourceActor::<Product>::new(buffer_size, next_product_id);

        let order_counter = Arc::new(AtomicU64::new(1));
        let next_order_id = move || {
            let id = order_counter.fetch_add(1, Ordering::SeqCst);
            OrderId(format!("order_{}", id))
        };
        let (order_actor, orders) = ResourceActor::<Order>::new(buffer_size, next_order_id);

        let handles = vec![tokio::spawn(product_actor.run()), tokio::spawn(order_actor.run())];
        (Self::new(products, orders), handles)
    }

    /// Changes a stored product in place, as a catalog edit seen by open forms.
    #[instrument(fields(product_id = %id), skip(self))]
    pub async fn patch_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ApiError> {
        debug!("Sending request");
        Ok(self.products.update(id, patch).await?)
    }

    async fn product_name(&self, id: ProductId) -> Result<String, ApiError> {
        self.products
            .get(id)
            .await?
            .map(|product| product.name)
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self.products.list().await?)
    }

    #[instrument(fields(product_name = %product.name), skip(self, product))]
    async fn create_product(&self, product: ProductCreate) -> Result<(), ApiError> {
        let created = self.products.create(product).await?;
        info!(product_id = %created.id, "Product stored");
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        Ok(self.products.delete(id).await?)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.orders.list().await?)
    }

    async fn show_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.orders
            .get(id.clone())
            .await?
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    #[instrument(
        fields(order_code = %order.order_code, product_id = %order.product_id),
        skip(self, order)
    )]
    async fn create_order(&self, order: OrderCreate) -> Result<(), ApiError> {
        let product_name = self.product_name(order.product_id).await?;
        let created = self.orders.create(NewOrder { order, product_name }).await?;
        info!(order_id = %created.id, "Order stored");
        Ok(())
    }

    #[instrument(fields(order_id = %id), skip(self, order))]
    async fn update_order(&self, id: &OrderId, order: OrderUpdate) -> Result<(), ApiError> {
        let product_name = self.product_name(order.product_id).await?;
        self.orders.update(id.clone(), OrderRevision { order, product_name }).await?;
        Ok(())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        Ok(self.orders.delete(id.clone()).await?)
    }
}
