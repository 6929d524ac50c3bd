use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A worker's self-reported completed-unit count against a quota order.
/// Created pending; verification/rejection is a separate terminal action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quota_id: ObjectId,
    pub order_id: ObjectId,
    pub employee_id: ObjectId,
    pub team_id: Option<ObjectId>,
    pub reported_completed: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: SubmissionPriority,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub verified_by: Option<ObjectId>,
    pub verified_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPriority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl Submission {
    pub const COLLECTION: &'static str = "submissions";
}
