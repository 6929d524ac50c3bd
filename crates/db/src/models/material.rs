use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub material_name: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Material {
    pub const COLLECTION: &'static str = "materials";
}
