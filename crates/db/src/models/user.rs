use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One account per actor. Identity is a single tagged value; the profile
/// matching the role is embedded rather than split across collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub customer: Option<CustomerProfile>,
    pub employee: Option<EmployeeProfile>,
    #[serde(default)]
    pub is_mfa_enabled: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    SalesAdmin,
    OperationalManager,
    Worker,
}

impl UserRole {
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Customer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::SalesAdmin => "sales_admin",
            UserRole::OperationalManager => "operational_manager",
            UserRole::Worker => "worker",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub company_name: String,
    pub contact_person: String,
    pub phone: Option<String>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub full_name: String,
    pub team_id: Option<ObjectId>,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    /// Display name shown to conversation counterparts.
    pub fn display_name(&self) -> String {
        match (&self.customer, &self.employee) {
            (Some(c), _) => c.company_name.clone(),
            (_, Some(e)) => e.full_name.clone(),
            _ => self.email.clone(),
        }
    }
}
