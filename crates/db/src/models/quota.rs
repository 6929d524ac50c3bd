use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A production target period. `finished_quota` only moves when a
/// submission against it is verified, never on submission create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub status: QuotaStatus,
    pub target_quota: i64,
    #[serde(default)]
    pub finished_quota: i64,
    #[serde(default)]
    pub order_ids: Vec<ObjectId>,
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuotaStatus {
    Active,
    Closed,
}

impl Quota {
    pub const COLLECTION: &'static str = "quotas";
}
