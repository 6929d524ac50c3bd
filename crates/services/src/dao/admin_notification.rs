use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{AdminNotification, NotificationType, TargetRole};

use super::base::{BaseDao, DaoResult};

pub struct AdminNotificationDao {
    pub base: BaseDao<AdminNotification>,
}

impl AdminNotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, AdminNotification::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        target_role: TargetRole,
        notification_type: NotificationType,
        title: String,
        body: String,
        order_id: Option<ObjectId>,
    ) -> DaoResult<AdminNotification> {
        let notification = AdminNotification {
            id: None,
            target_role,
            notification_type,
            title,
            body,
            order_id,
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&notification).await?;
        self.base.find_by_id(id).await
    }

    /// Rows targeted at `role` directly or at `both`.
    pub async fn find_for_role(
        &self,
        role: TargetRole,
        unread_only: bool,
    ) -> DaoResult<Vec<AdminNotification>> {
        let role_str = match role {
            TargetRole::SalesAdmin => "sales_admin",
            TargetRole::OperationalManager => "operational_manager",
            TargetRole::Both => "both",
        };
        let mut filter = doc! { "target_role": { "$in": [role_str, "both"] } };
        if unread_only {
            filter.insert("is_read", false);
        }
        self.base
            .find_many(filter, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn mark_read(&self, id: ObjectId) -> DaoResult<AdminNotification> {
        self.base
            .update_one(
                doc! { "_id": id, "is_read": false },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    pub async fn mark_all_read(&self, role: TargetRole) -> DaoResult<u64> {
        let role_str = match role {
            TargetRole::SalesAdmin => "sales_admin",
            TargetRole::OperationalManager => "operational_manager",
            TargetRole::Both => "both",
        };
        self.base
            .update_many(
                doc! { "target_role": { "$in": [role_str, "both"] }, "is_read": false },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }
}
