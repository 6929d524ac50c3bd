use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{Quota, QuotaStatus};

use super::base::{BaseDao, DaoResult};

pub struct QuotaDao {
    pub base: BaseDao<Quota>,
}

impl QuotaDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Quota::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        target_quota: i64,
        order_ids: Vec<ObjectId>,
        starts_at: DateTime,
        ends_at: DateTime,
    ) -> DaoResult<Quota> {
        let now = DateTime::now();
        let quota = Quota {
            id: None,
            name,
            status: QuotaStatus::Active,
            target_quota,
            finished_quota: 0,
            order_ids,
            starts_at,
            ends_at,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&quota).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find(&self, status: Option<QuotaStatus>) -> DaoResult<Vec<Quota>> {
        let mut filter = doc! {};
        if let Some(status) = status {
            let status_str = match status {
                QuotaStatus::Active => "active",
                QuotaStatus::Closed => "closed",
            };
            filter.insert("status", status_str);
        }
        self.base
            .find_many(filter, Some(doc! { "starts_at": -1 }))
            .await
    }

    /// Moves the progress counter; only called from submission verification.
    pub async fn increment_finished(&self, quota_id: ObjectId, amount: i64) -> DaoResult<bool> {
        self.base
            .update_by_id(
                quota_id,
                doc! {
                    "$inc": { "finished_quota": amount },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
    }
}
