use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{Team, TeamType};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct TeamDao {
    pub base: BaseDao<Team>,
}

impl TeamDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Team::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        team_type: TeamType,
        member_ids: Vec<ObjectId>,
    ) -> DaoResult<Team> {
        let now = DateTime::now();
        let team = Team {
            id: None,
            name,
            team_type,
            member_ids,
            order_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&team).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_member(&self, user_id: ObjectId) -> DaoResult<Team> {
        self.base
            .find_one(doc! { "member_ids": user_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn assign_order(&self, team_id: ObjectId, order_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                team_id,
                doc! {
                    "$addToSet": { "order_ids": order_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
    }
}
