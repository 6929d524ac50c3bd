use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::{Submission, SubmissionPriority, SubmissionStatus};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct SubmissionDao {
    pub base: BaseDao<Submission>,
}

impl SubmissionDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Submission::COLLECTION),
        }
    }

    /// Fire-and-forget create: the submission lands `pending` and the quota
    /// counter is untouched until a verifier acts on it.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        quota_id: ObjectId,
        order_id: ObjectId,
        employee_id: ObjectId,
        team_id: Option<ObjectId>,
        reported_completed: i64,
        notes: Option<String>,
        priority: SubmissionPriority,
    ) -> DaoResult<Submission> {
        if reported_completed < 1 {
            return Err(DaoError::Validation(
                "reported_completed must be a positive integer".to_string(),
            ));
        }

        let submission = Submission {
            id: None,
            quota_id,
            order_id,
            employee_id,
            team_id,
            reported_completed,
            notes,
            priority,
            status: SubmissionStatus::Pending,
            verified_by: None,
            verified_at: None,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&submission).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_quota(&self, quota_id: ObjectId) -> DaoResult<Vec<Submission>> {
        self.base
            .find_many(doc! { "quota_id": quota_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    /// pending → verified. The `status: pending` filter makes the transition
    /// terminal: a second verify (or a verify after reject) matches nothing
    /// and surfaces as a conflict.
    pub async fn verify(&self, id: ObjectId, verifier_id: ObjectId) -> DaoResult<Submission> {
        self.transition(id, verifier_id, SubmissionStatus::Verified)
            .await
    }

    /// pending → rejected; the quota counter stays untouched.
    pub async fn reject(&self, id: ObjectId, verifier_id: ObjectId) -> DaoResult<Submission> {
        self.transition(id, verifier_id, SubmissionStatus::Rejected)
            .await
    }

    async fn transition(
        &self,
        id: ObjectId,
        verifier_id: ObjectId,
        status: SubmissionStatus,
    ) -> DaoResult<Submission> {
        let status_str = match status {
            SubmissionStatus::Verified => "verified",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Pending => {
                return Err(DaoError::Validation(
                    "Cannot transition back to pending".to_string(),
                ));
            }
        };

        let modified = self
            .base
            .update_one(
                doc! { "_id": id, "status": "pending" },
                doc! { "$set": {
                    "status": status_str,
                    "verified_by": verifier_id,
                    "verified_at": DateTime::now(),
                }},
            )
            .await?;

        if !modified {
            // Distinguish a missing row from an already-settled one
            let existing = self.base.find_by_id(id).await?;
            return Err(DaoError::Conflict(format!(
                "Submission already {}",
                match existing.status {
                    SubmissionStatus::Verified => "verified",
                    SubmissionStatus::Rejected => "rejected",
                    SubmissionStatus::Pending => "pending",
                }
            )));
        }

        self.base.find_by_id(id).await
    }
}
