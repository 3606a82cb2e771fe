use super::error::{Checker, ValidationErrors};
use crate::domain::{Operator, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, ProductId};
use crate::reconciler::{Catalog, LineItem};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Whether a form session creates a new order or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(OrderId),
}

/// Form-local state of an order being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub order_code: String,
    pub status: OrderStatus,
    pub payment_type: String,
    pub start_process: Option<NaiveDate>,
    pub end_process: Option<NaiveDate>,
    pub line: LineItem,
}

/// `ORD-` followed by the unix time in milliseconds.
pub fn generate_order_code(now: DateTime<Utc>) -> String {
    format!("ORD-{}", now.timestamp_millis())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl OrderDraft {
    /// A blank draft for a new order: generated code, pending, processing starts today.
    pub fn fresh(catalog: Catalog, now: DateTime<Utc>) -> Self {
        Self {
            order_code: generate_order_code(now),
            status: OrderStatus::Pending,
            payment_type: String::new(),
            start_process: Some(now.date_naive()),
            end_process: None,
            line: LineItem::new(catalog),
        }
    }

    /// A draft pre-filled from a stored order, resolved against `catalog`.
    ///
    /// If the order's product is gone from the catalog the draft starts with no selection.
    pub fn from_order(order: &Order, catalog: Catalog) -> Self {
        let mut line = LineItem::default();
        line.reconcile(catalog, order.product_id, i64::from(order.quantity));
        Self {
            order_code: order.order_code.clone(),
            status: order.status,
            payment_type: order.payment_type.clone(),
            start_process: order.start_process.map(|d| d.date_naive()),
            end_process: order.end_process.map(|d| d.date_naive()),
            line,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.checked_product().map(|_| ())
    }

    /// Builds the create request, stamping `creby`/`cretime`.
    pub fn to_create(
        &self,
        operator: &Operator,
        now: DateTime<Utc>,
    ) -> Result<OrderCreate, ValidationErrors> {
        let product_id = self.checked_product()?;
        Ok(OrderCreate {
            order_code: self.order_code.trim().to_string(),
            product_id,
            quantity: self.line.quantity(),
            price: self.line.total(),
            status: self.status,
            payment_type: self.payment_type.trim().to_string(),
            start_process: self.start_process.map(start_of_day),
            end_process: self.end_process.map(start_of_day),
            creby: operator.name.clone(),
            cretime: now,
        })
    }

    /// Builds the update request, stamping `modby`/`modtime`.
    pub fn to_update(
        &self,
        operator: &Operator,
        now: DateTime<Utc>,
    ) -> Result<OrderUpdate, ValidationErrors> {
        let product_id = self.checked_product()?;
        Ok(OrderUpdate {
            order_code: self.order_code.trim().to_string(),
            product_id,
            quantity: self.line.quantity(),
            price: self.line.total(),
            status: self.status,
            payment_type: self.payment_type.trim().to_string(),
            start_process: self.start_process.map(start_of_day),
            end_process: self.end_process.map(start_of_day),
            modby: operator.name.clone(),
            modtime: now,
        })
    }

    fn checked_product(&self) -> Result<ProductId, ValidationErrors> {
        let mut check = Checker::default();
        check.require(!self.order_code.trim().is_empty(), "order_code", "Order code is required.");
        let product = self.line.selected_id();
        check.require(product.is_some(), "product_id", "A product must be selected.");
        check.require(self.line.quantity() >= 1, "quantity", "Quantity must be at least 1.");
        check.require(self.line.total() >= 1, "price", "Price must be greater than 0.");
        check.require(
            !self.payment_type.trim().is_empty(),
            "payment_type",
            "Payment type is required.",
        );
        check.finish()?;
        // the checker already refused a missing product
        product.ok_or_else(|| ValidationErrors(Vec::new()))
    }
}
