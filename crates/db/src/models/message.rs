use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A single message in a customer/staff conversation. Messages are append
/// only; a conversation is the set of messages sharing the
/// (customer_id, employee_id) pair and is never stored as its own row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    pub employee_id: ObjectId,
    pub sender: SenderType,
    pub sender_name: String,
    pub content: String,
    pub attachment: Option<MessageAttachment>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Customer,
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub filename: String,
    pub content_type: String,
    /// Decoded size in bytes, checked against the configured cap on send.
    pub size: u64,
    pub data_base64: String,
}

impl Message {
    pub const COLLECTION: &'static str = "messages";
}
