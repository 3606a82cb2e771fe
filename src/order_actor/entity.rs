use crate::actor_framework::Entity;
use crate::domain::{AuditTrail, Order, OrderCreate, OrderId, OrderUpdate};

/// Create request plus the product name resolved by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order: OrderCreate,
    pub product_name: String,
}

/// Update request plus the product name resolved by the store.
#[derive(Debug, Clone)]
pub struct OrderRevision {
    pub order: OrderUpdate,
    pub product_name: String,
}

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = NewOrder;
    type UpdateParams = OrderRevision;

    fn from_create_params(id: OrderId, params: NewOrder) -> Result<Self, String> {
        let NewOrder { order, product_name } = params;
        if order.order_code.trim().is_empty() {
            return Err("Order code is required".to_string());
        }
        Ok(Self {
            id,
            order_code: order.order_code,
            product_name,
            product_id: Some(order.product_id),
            quantity: order.quantity,
            price: order.price,
            status: order.status,
            start_process: order.start_process,
            end_process: order.end_process,
            payment_type: order.payment_type,
            audit: AuditTrail {
                creby: Some(order.creby),
                cretime: Some(order.cretime),
                ..AuditTrail::default()
            },
        })
    }

    /// Applies an update. Process dates left out of the request keep their stored value.
    fn on_update(&mut self, params: OrderRevision) -> Result<(), String> {
        let OrderRevision { order, product_name } = params;
        self.order_code = order.order_code;
        self.product_name = product_name;
        self.product_id = Some(order.product_id);
        self.quantity = order.quantity;
        self.price = order.price;
        self.status = order.status;
        self.payment_type = order.payment_type;
        if order.start_process.is_some() {
            self.start_process = order.start_process;
        }
        if order.end_process.is_some() {
            self.end_process = order.end_process;
        }
        self.audit.modby = Some(order.modby);
        self.audit.modtime = Some(order.modtime);
        Ok(())
    }
}
