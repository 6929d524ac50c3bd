use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{Notification, NotificationType};

use super::base::{BaseDao, DaoResult};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        customer_id: ObjectId,
        notification_type: NotificationType,
        title: String,
        body: String,
        order_id: Option<ObjectId>,
        thumbnail: Option<String>,
        thumbnail_type: Option<String>,
    ) -> DaoResult<Notification> {
        let notification = Notification {
            id: None,
            customer_id,
            notification_type,
            title,
            body,
            order_id,
            thumbnail,
            thumbnail_type,
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&notification).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_customer(
        &self,
        customer_id: ObjectId,
        unread_only: bool,
    ) -> DaoResult<Vec<Notification>> {
        let mut filter = doc! { "customer_id": customer_id };
        if unread_only {
            filter.insert("is_read", false);
        }
        self.base
            .find_many(filter, Some(doc! { "created_at": -1 }))
            .await
    }

    /// Idempotent: marking an already-read notification modifies nothing
    /// and keeps the original `read_at`.
    pub async fn mark_read(&self, id: ObjectId) -> DaoResult<Notification> {
        self.base
            .update_one(
                doc! { "_id": id, "is_read": false },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    pub async fn mark_all_read(&self, customer_id: ObjectId) -> DaoResult<u64> {
        self.base
            .update_many(
                doc! { "customer_id": customer_id, "is_read": false },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }

    pub async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        self.base.delete_by_id(id).await
    }
}
