use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::notification::NotificationType;

/// Staff notification scoped to a role rather than an individual user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminNotification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub target_role: TargetRole,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub order_id: Option<ObjectId>,
    #[serde(default)]
    pub is_read: bool,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetRole {
    SalesAdmin,
    OperationalManager,
    Both,
}

impl AdminNotification {
    pub const COLLECTION: &'static str = "admin_notifications";
}
