use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    pub status: OrderStatus,
    pub quantity: i64,
    pub total_price: f64,
    pub deadline: Option<DateTime>,
    pub company_name: String,
    pub contact_person: String,
    pub delivery_address: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    VerifyingPayment,
    InProduction,
    WaitingForShipment,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::VerifyingPayment => "verifying_payment",
            OrderStatus::InProduction => "in_production",
            OrderStatus::WaitingForShipment => "waiting_for_shipment",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Append-only status history row, written on every transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub order_id: ObjectId,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub actor_id: ObjectId,
    pub created_at: DateTime,
}

impl Order {
    pub const COLLECTION: &'static str = "orders";
}

impl OrderLog {
    pub const COLLECTION: &'static str = "order_logs";
}
