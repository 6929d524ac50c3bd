use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::LoginCode;

use super::base::{BaseDao, DaoResult};

pub struct LoginCodeDao {
    pub base: BaseDao<LoginCode>,
}

impl LoginCodeDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, LoginCode::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        code: String,
        ttl_secs: u64,
    ) -> DaoResult<LoginCode> {
        let now = DateTime::now();
        let expires_at =
            DateTime::from_millis(now.timestamp_millis() + (ttl_secs as i64) * 1000);
        let login_code = LoginCode {
            id: None,
            user_id,
            code,
            expires_at,
            consumed_at: None,
            created_at: now,
        };

        let id = self.base.insert_one(&login_code).await?;
        self.base.find_by_id(id).await
    }

    /// Consumes the code if it matches, is unconsumed, and has not expired.
    /// One-shot: the `consumed_at: null` filter makes a second consume a
    /// no-op, and the caller sees it as a miss.
    pub async fn consume(&self, user_id: ObjectId, code: &str) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! {
                    "user_id": user_id,
                    "code": code,
                    "consumed_at": null,
                    "expires_at": { "$gt": DateTime::now() },
                },
                doc! { "$set": { "consumed_at": DateTime::now() } },
            )
            .await
    }
}
