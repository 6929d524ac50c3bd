use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub team_type: TeamType,
    #[serde(default)]
    pub member_ids: Vec<ObjectId>,
    /// Orders currently assigned to this team for production.
    #[serde(default)]
    pub order_ids: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    Production,
    Assembly,
}

impl Team {
    pub const COLLECTION: &'static str = "teams";
}
