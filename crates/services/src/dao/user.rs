use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{CustomerProfile, EmployeeProfile, User, UserRole};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create_customer(
        &self,
        email: String,
        password_hash: String,
        profile: CustomerProfile,
    ) -> DaoResult<User> {
        self.create(email, password_hash, UserRole::Customer, Some(profile), None)
            .await
    }

    pub async fn create_staff(
        &self,
        email: String,
        password_hash: String,
        role: UserRole,
        profile: EmployeeProfile,
    ) -> DaoResult<User> {
        if !role.is_staff() {
            return Err(DaoError::Validation(
                "Staff account requires a staff role".to_string(),
            ));
        }
        self.create(email, password_hash, role, None, Some(profile))
            .await
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        role: UserRole,
        customer: Option<CustomerProfile>,
        employee: Option<EmployeeProfile>,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            password_hash: Some(password_hash),
            role,
            customer,
            employee,
            is_mfa_enabled: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_active_by_id(&self, user_id: ObjectId) -> DaoResult<User> {
        self.base
            .find_one(doc! { "_id": user_id, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn update_password(
        &self,
        user_id: ObjectId,
        password_hash: String,
    ) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": {
                    "password_hash": password_hash,
                    "updated_at": DateTime::now(),
                }},
            )
            .await
    }

    pub async fn set_mfa_enabled(&self, user_id: ObjectId, enabled: bool) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": {
                    "is_mfa_enabled": enabled,
                    "updated_at": DateTime::now(),
                }},
            )
            .await
    }

    pub async fn soft_delete(&self, user_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": {
                    "deleted_at": DateTime::now(),
                    "updated_at": DateTime::now(),
                }},
            )
            .await
    }

    /// User ids of every active staff member holding `role`.
    pub async fn staff_ids_by_role(&self, role: UserRole) -> DaoResult<Vec<ObjectId>> {
        let users = self
            .base
            .find_many(
                doc! { "role": role.as_str(), "deleted_at": null },
                None,
            )
            .await?;
        Ok(users.into_iter().filter_map(|u| u.id).collect())
    }
}
