use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub order_id: Option<ObjectId>,
    pub thumbnail: Option<String>,
    pub thumbnail_type: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OrderStatus,
    Payment,
    Delivery,
    System,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
