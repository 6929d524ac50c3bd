use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One-shot second-factor code persisted when an MFA-enabled user logs in.
/// Consumption is recorded rather than deleting the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCode {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub code: String,
    pub expires_at: DateTime,
    pub consumed_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl LoginCode {
    pub const COLLECTION: &'static str = "login_codes";
}
