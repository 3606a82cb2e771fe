//! Orders as the backend stores them, plus the create/update payloads.

use super::{AuditTrail, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders. Opaque string key assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Processing status of an order.
///
/// The backend spells the cancelled state `cancle`; that spelling is what goes on
/// the wire, while `cancelled` is also accepted when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    #[serde(rename = "cancle", alias = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancle",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancle" | "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A stored order. `price` is the line total, not the unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_code: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    #[serde(deserialize_with = "super::whole_number::deserialize")]
    pub price: u64,
    pub status: OrderStatus,
    #[serde(default)]
    pub start_process: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_process: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_type: String,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

/// Payload for creating a new order. Unset process dates are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_code: String,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: u64,
    pub status: OrderStatus,
    pub payment_type: String,
    pub start_process: Option<DateTime<Utc>>,
    pub end_process: Option<DateTime<Utc>>,
    pub creby: String,
    pub cretime: DateTime<Utc>,
}

/// Payload for updating an order. Unset process dates are left out entirely so
/// the backend keeps whatever it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_code: String,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: u64,
    pub status: OrderStatus,
    pub payment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_process: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_process: Option<DateTime<Utc>>,
    pub modby: String,
    pub modtime: DateTime<Utc>,
}
