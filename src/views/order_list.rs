use crate::api::Backend;
use crate::domain::{Order, OrderId, OrderStatus};
use crate::error::ApiError;
use crate::format::{date_or_dash, name_or_dash, rupiah};
use crate::notice::Notifier;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Colour family of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Info,
    Warning,
    Danger,
}

impl From<OrderStatus> for BadgeTone {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Completed => BadgeTone::Success,
            OrderStatus::Processing => BadgeTone::Info,
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Cancelled => BadgeTone::Danger,
        }
    }
}

/// One display row of the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: OrderId,
    pub order_code: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: String,
    pub status: &'static str,
    pub tone: BadgeTone,
    pub payment_type: String,
    pub start_process: String,
    pub end_process: String,
    pub created_by: String,
    pub created_at: String,
    pub modified_by: String,
    pub modified_at: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            order_code: order.order_code.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            price: rupiah(order.price),
            status: order.status.as_str(),
            tone: order.status.into(),
            payment_type: order.payment_type.clone(),
            start_process: date_or_dash(order.start_process),
            end_process: date_or_dash(order.end_process),
            created_by: name_or_dash(order.audit.creby.as_deref()),
            created_at: date_or_dash(order.audit.cretime),
            modified_by: name_or_dash(order.audit.modby.as_deref()),
            modified_at: date_or_dash(order.audit.modtime),
        }
    }
}

/// The orders list screen.
#[derive(Clone)]
pub struct OrderListView {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
}

impl OrderListView {
    pub fn new(backend: Arc<dyn Backend>, notifier: Notifier) -> Self {
        Self { backend, notifier }
    }

    #[instrument(skip(self))]
    pub async fn rows(&self) -> Result<Vec<OrderRow>, ApiError> {
        match self.backend.list_orders().await {
            Ok(orders) => {
                info!(count = orders.len(), "Orders loaded");
                Ok(orders.iter().map(OrderRow::from).collect())
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                Err(e)
            }
        }
    }

    /// Deletes an order, notifies, and returns the reloaded table.
    #[instrument(fields(order_id = %id), skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<Vec<OrderRow>, ApiError> {
        if let Err(e) = self.backend.delete_order(id).await {
            self.notifier.error("Something went wrong while deleting the order.");
            return Err(e);
        }
        self.notifier.success("Order deleted.");
        self.rows().await
    }
}
